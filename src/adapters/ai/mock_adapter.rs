//! Mock AI adapter for running without an API key.
//!
//! Returns hardcoded responses for development and testing purposes.

use crate::domain::DomainError;
use crate::ports::AiPort;
use std::time::Duration;
use tracing::info;

/// Mock AI adapter.
///
/// Returns a predetermined answer without making API calls. Simulates
/// network latency with a configurable delay.
pub struct MockAiAdapter {
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
}

impl MockAiAdapter {
    /// Create a new mock adapter with default delay (100ms).
    pub fn new() -> Self {
        Self { delay_ms: 100 }
    }

    /// Create a mock adapter with custom delay.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self { delay_ms }
    }
}

impl Default for MockAiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AiPort for MockAiAdapter {
    async fn ask(&self, prompt: &str) -> Result<String, DomainError> {
        info!(prompt_len = prompt.len(), "[MOCK] Simulating Gemini answer");

        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;

        Ok(format!(
            "[MOCK] This is a simulated answer. In production the configured \
             Gemini model would answer from the extracted invoice text. \
             (prompt was {} characters)",
            prompt.len()
        ))
    }
}
