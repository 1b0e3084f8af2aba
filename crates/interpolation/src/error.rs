//! Error types for the interpolation engine.

use thiserror::Error;

/// Errors from interpolating observations onto the grid.
#[derive(Debug, Error)]
pub enum InterpolationError {
    /// Grid-level failure, including out-of-range coordinates from an
    /// upstream normalization bug.
    #[error(transparent)]
    Grid(#[from] grid_model::GridError),

    /// An observation's timestamp does not match the frame being built.
    #[error("observation timestamp {actual} does not match frame timestamp {expected}")]
    TimestampMismatch { expected: String, actual: String },

    /// Configuration failed validation.
    #[error("invalid interpolation config: {0}")]
    InvalidConfig(String),

    /// The batch was cancelled before completing.
    #[error("interpolation batch cancelled")]
    Cancelled,
}

/// Result type for interpolation operations.
pub type Result<T> = std::result::Result<T, InterpolationError>;
