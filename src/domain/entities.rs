//! Domain entities. Pure data structures for the core business.
//!
//! No Drive/OCR/HTTP types here — these are mapped from adapters.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A file listed from a remote Drive folder. Ephemeral: re-fetched on every
/// folder submission, never cached across interactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    pub id: String,
    pub name: String,
}

/// Where the image for one interaction comes from. Consumed once by the
/// resolver, which turns it into a local path.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Raw bytes handed over by the user (local file picked in the UI).
    Uploaded { bytes: Vec<u8>, filename: String },
    /// A file in a remote Drive folder, downloaded by id.
    Remote { folder_id: String, file: RemoteFile },
}

/// Pixel-space bounding box of one recognized fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// One recognized text fragment, in the engine's native scan order.
/// Region and confidence are carried through but the extractor discards
/// them — no confidence-based filtering happens downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextDetection {
    pub region: Region,
    pub text: String,
    pub confidence: f32,
}

/// A resolved image on local disk, validated as decodable.
#[derive(Debug, Clone)]
pub struct LocalImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}
