//! Error types for the stores.

use thiserror::Error;

/// Errors from record and feature storage.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid stored document: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Grid(#[from] grid_model::GridError),

    /// Frame payload failed to decode to the expected shape.
    #[error("frame codec error: {0}")]
    Codec(String),

    #[error("feature not found: {0}")]
    FeatureNotFound(String),

    /// Feature names become directory names; path separators are
    /// rejected.
    #[error("invalid feature name: {0}")]
    InvalidFeatureName(String),

    /// A record file could not be parsed.
    #[error("bad record file {path}: {reason}")]
    BadRecordFile { path: String, reason: String },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
