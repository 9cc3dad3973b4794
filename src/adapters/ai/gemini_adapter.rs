//! Gemini adapter. Implements AiPort via the generateContent REST endpoint.
//!
//! Configured once at startup with an API key and a fixed model id. No
//! retries, no timeout tuning, no response caching: every question makes a
//! full round trip.

use crate::domain::DomainError;
use crate::ports::AiPort;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini generative-text adapter.
pub struct GeminiAdapter {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiAdapter {
    /// Create a new Gemini adapter.
    ///
    /// # Arguments
    /// * `api_key` - Gemini API key (sent as a query parameter)
    /// * `model` - Model id (e.g. "gemini-1.5-flash")
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            GEMINI_API_BASE, self.model, self.api_key
        )
    }

    /// Pull the answer text out of a parsed response: first candidate, all
    /// text parts concatenated.
    fn answer_text(response: GenerateResponse) -> Option<String> {
        let candidate = response.candidates.into_iter().next()?;
        let text: String = candidate
            .content
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        if text.is_empty() { None } else { Some(text) }
    }
}

/// generateContent request structure.
#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

/// generateContent response structure.
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[async_trait::async_trait]
impl AiPort for GeminiAdapter {
    async fn ask(&self, prompt: &str) -> Result<String, DomainError> {
        info!(
            model = %self.model,
            prompt_len = prompt.len(),
            "sending prompt to Gemini"
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::Ai(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %text, "Gemini API returned error");
            return Err(DomainError::Ai(format!(
                "API error {}: {}",
                status,
                text.chars().take(200).collect::<String>()
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| DomainError::Ai(format!("Failed to parse API response: {}", e)))?;

        let answer = Self::answer_text(parsed)
            .ok_or_else(|| DomainError::Ai("No candidates returned".to_string()))?;

        debug!(answer_len = answer.len(), "received Gemini answer");

        Ok(answer.trim().to_string())
    }
}
