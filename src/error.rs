//! Error types for the boarding pass app

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for everything that can go wrong outside the phase machine
#[derive(Error, Debug)]
pub enum PassError {
    /// Reading an upload or writing an export failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Uploaded bytes could not be decoded as an image
    #[error("Image decode error: {0}")]
    Image(#[from] image::ImageError),

    /// Bytes decoded but the format is not one we embed
    #[error("Unsupported image format: {0}")]
    UnsupportedImage(String),

    /// Catalog file failed validation
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Ticket export failed
    #[error("Export to {path:?} failed: {reason}")]
    Export { path: PathBuf, reason: String },
}

/// Result type alias using PassError
pub type Result<T> = std::result::Result<T, PassError>;
