//! Mock OCR adapter. Preset fragments, no engine required.
//!
//! Wired in when the crate is built without the `tesseract` feature, and
//! used by pipeline tests.

use crate::domain::{DomainError, Region, TextDetection};
use crate::ports::OcrPort;
use async_trait::async_trait;
use std::path::Path;
use tracing::info;

/// Mock recognizer returning fixed fragments in order.
pub struct MockOcrAdapter {
    fragments: Vec<String>,
}

impl MockOcrAdapter {
    /// Demo fragments resembling a scanned invoice.
    pub fn new() -> Self {
        Self::with_fragments(&["INVOICE", "#102", "TOTAL", "$45.00"])
    }

    pub fn with_fragments(fragments: &[&str]) -> Self {
        Self {
            fragments: fragments.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for MockOcrAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OcrPort for MockOcrAdapter {
    async fn recognize(&self, path: &Path) -> Result<Vec<TextDetection>, DomainError> {
        info!(path = %path.display(), "[MOCK] Simulating OCR");
        Ok(self
            .fragments
            .iter()
            .enumerate()
            .map(|(i, text)| TextDetection {
                region: Region {
                    x: (i as u32) * 40,
                    y: 0,
                    width: 36,
                    height: 12,
                },
                text: text.clone(),
                confidence: 0.99,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_fragments_in_order() {
        let ocr = MockOcrAdapter::with_fragments(&["a", "b", "c"]);
        let detections = ocr.recognize(Path::new("whatever.png")).await.unwrap();
        let texts: Vec<_> = detections.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(texts, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn ignores_image_content() {
        let ocr = MockOcrAdapter::new();
        let a = ocr.recognize(Path::new("one.png")).await.unwrap();
        let b = ocr.recognize(Path::new("two.png")).await.unwrap();
        assert_eq!(a, b);
    }
}
