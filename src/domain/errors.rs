//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    /// Service-account credential file missing or malformed. Fatal at
    /// startup; remote mode cannot run without it.
    #[error("Credential error: {0}")]
    Credentials(String),

    #[error("Drive storage error: {0}")]
    Storage(String),

    #[error("Text recognition failed: {0}")]
    Ocr(String),

    #[error("Image is unreadable or not a decodable image: {0}")]
    InvalidImage(String),

    #[error("AI answer failed: {0}")]
    Ai(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Input error: {0}")]
    Input(String),
}
