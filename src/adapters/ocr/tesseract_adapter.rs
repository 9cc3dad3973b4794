//! Tesseract OCR adapter (leptess).
//!
//! The engine is probed once at construction so a missing language pack
//! fails at startup instead of on the first image. Each call builds a fresh
//! LepTess instance: the handle is not Sync, and per-call setup is cheap
//! next to recognition itself.

use crate::domain::{DomainError, Region, TextDetection};
use crate::ports::OcrPort;
use async_trait::async_trait;
use leptess::LepTess;
use std::path::Path;
use tracing::debug;

/// Tesseract-backed recognizer with a fixed language set (e.g. "eng+ara").
pub struct TesseractOcr {
    languages: String,
}

impl TesseractOcr {
    /// Create the adapter, verifying Tesseract initializes with `languages`.
    pub fn new(languages: &str) -> Result<Self, DomainError> {
        let _probe = LepTess::new(None, languages).map_err(|e| {
            DomainError::Ocr(format!(
                "failed to initialize Tesseract with '{}': {}. \
                 Make sure the language data is installed (e.g. tesseract-ocr-ara)",
                languages, e
            ))
        })?;
        Ok(Self {
            languages: languages.to_string(),
        })
    }
}

#[async_trait]
impl OcrPort for TesseractOcr {
    async fn recognize(&self, path: &Path) -> Result<Vec<TextDetection>, DomainError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DomainError::Io(format!("read {}: {}", path.display(), e)))?;

        let mut lt = LepTess::new(None, &self.languages)
            .map_err(|e| DomainError::Ocr(format!("Tesseract init: {}", e)))?;
        lt.set_image_from_mem(&bytes)
            .map_err(|e| DomainError::Ocr(format!("set image {}: {}", path.display(), e)))?;

        // Word-level component boxes, in Tesseract's native scan order.
        // None means no text was detected — a valid empty result.
        let boxes = match lt.get_component_boxes(leptess::capi::TessPageIteratorLevel_RIL_WORD, true)
        {
            Some(boxes) => boxes,
            None => return Ok(Vec::new()),
        };

        let mut detections = Vec::new();
        for bbox in &boxes {
            let geom = bbox.get_geometry();
            lt.set_rectangle(geom.x, geom.y, geom.w, geom.h);

            let text = lt.get_utf8_text().unwrap_or_default().trim().to_string();
            if text.is_empty() {
                continue;
            }

            // Confidence is reported but never used to filter; the extractor
            // keeps every fragment.
            let confidence = lt.mean_text_conf() as f32 / 100.0;
            debug!(%text, confidence, "recognized fragment");

            detections.push(TextDetection {
                region: Region {
                    x: geom.x.max(0) as u32,
                    y: geom.y.max(0) as u32,
                    width: geom.w.max(0) as u32,
                    height: geom.h.max(0) as u32,
                },
                text,
                confidence,
            });
        }

        Ok(detections)
    }
}
