//! Error types for the grid model.

use thiserror::Error;

/// Errors from grid construction, indexing, and series assembly.
#[derive(Debug, Error)]
pub enum GridError {
    /// Coordinate outside the configured domain after normalization.
    ///
    /// This indicates an upstream normalization bug and is surfaced to the
    /// caller rather than recovered.
    #[error("coordinate out of range: lat={lat}, lon={lon}")]
    OutOfRange { lat: f64, lon: f64 },

    /// Resolution is non-positive, non-finite, or does not divide the
    /// domain span into whole cells.
    #[error("invalid grid resolution: {resolution} degrees for domain span {span_lat}x{span_lon}")]
    InvalidResolution {
        resolution: f64,
        span_lat: f64,
        span_lon: f64,
    },

    /// Frame data length does not match the grid shape.
    #[error("frame shape mismatch: expected {expected_rows}x{expected_cols}, got {actual} cells")]
    ShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        actual: usize,
    },

    /// Series frames are not in strictly increasing timestamp order.
    #[error("series frames out of order at {time}")]
    UnorderedSeries { time: String },

    /// Two frames in a series share a timestamp.
    #[error("duplicate frame timestamp: {time}")]
    DuplicateTimestamp { time: String },
}

/// Result type for grid model operations.
pub type Result<T> = std::result::Result<T, GridError>;
