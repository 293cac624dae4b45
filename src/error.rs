//! Error types for Pastis Share.

use thiserror::Error;

/// Common error type for Pastis Share.
#[derive(Error, Debug)]
pub enum ShareError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Key-value storage error.
    #[error("storage error: {0}")]
    Storage(#[from] crate::file::StoreError),

    /// Upload batch error.
    #[error("upload error: {0}")]
    Upload(#[from] crate::file::BatchError),

    /// Malformed inline file content.
    #[error("data URI error: {0}")]
    DataUri(#[from] crate::file::DataUriError),

    /// A mutation was applied but its save did not go through.
    #[error("changes not saved: {0}")]
    NotSaved(crate::file::SaveOutcome),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for Pastis Share operations.
pub type Result<T> = std::result::Result<T, ShareError>;
