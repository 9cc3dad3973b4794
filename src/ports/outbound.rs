//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, RemoteFile, TextDetection};
use std::path::Path;

/// Remote file storage gateway (Google Drive). List a folder, download by id.
#[async_trait::async_trait]
pub trait StorageGateway: Send + Sync {
    /// List files whose parent is `folder_id`. An empty folder yields an
    /// empty vec — that is a valid result, not an error.
    async fn list_folder(&self, folder_id: &str) -> Result<Vec<RemoteFile>, DomainError>;

    /// Stream-download the file's media bytes into `dest`, chunk by chunk,
    /// until the transfer completes. No retry on a failed chunk.
    async fn download_file(&self, file_id: &str, dest: &Path) -> Result<(), DomainError>;
}

/// Text recognition engine. Configured once at startup with a fixed language
/// set; shared across all interactions.
#[async_trait::async_trait]
pub trait OcrPort: Send + Sync {
    /// Recognize text in the image at `path`. Detections come back in the
    /// engine's native left-to-right, top-to-bottom scan order. Zero
    /// detections is a valid result.
    async fn recognize(&self, path: &Path) -> Result<Vec<TextDetection>, DomainError>;
}

/// Generative-text endpoint. One prompt in, one trimmed answer out.
#[async_trait::async_trait]
pub trait AiPort: Send + Sync {
    /// Send the composed prompt and return the model's answer text.
    async fn ask(&self, prompt: &str) -> Result<String, DomainError>;
}
