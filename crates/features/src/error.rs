//! Error types for feature derivation.

use thiserror::Error;

/// Errors from deriving feature series.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Attempted combination of series on incompatible grids.
    ///
    /// Fatal to the derivation call: it indicates a configuration
    /// mismatch between sources, not a data condition.
    #[error("grid mismatch: {left} vs {right}")]
    GridMismatch { left: String, right: String },

    /// No frames of the input series fall inside the reference period.
    #[error("no frames in reference period {start}..={end}")]
    EmptyReference { start: String, end: String },

    /// Underlying grid model failure.
    #[error(transparent)]
    Grid(#[from] grid_model::GridError),
}

/// Result type for feature derivation operations.
pub type Result<T> = std::result::Result<T, FeatureError>;
