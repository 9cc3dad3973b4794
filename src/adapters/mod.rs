//! Infrastructure adapters. Implement outbound ports.
//!
//! Drive, OCR engine, Gemini, terminal UI. Map errors to DomainError.

pub mod ai;
pub mod ocr;
pub mod storage;
pub mod ui;
