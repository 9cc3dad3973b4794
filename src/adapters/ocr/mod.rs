//! OCR adapter module. Implements OcrPort.
//!
//! The real Tesseract engine is gated behind the `tesseract` cargo feature
//! (needs system libtesseract); the mock recognizer is always available.

pub mod mock_adapter;
#[cfg(feature = "tesseract")]
pub mod tesseract_adapter;

pub use mock_adapter::MockOcrAdapter;
#[cfg(feature = "tesseract")]
pub use tesseract_adapter::TesseractOcr;
