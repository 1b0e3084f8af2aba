//! Dense per-timestamp grid snapshots.

use climate_common::TimeBucket;

use crate::error::{GridError, Result};
use crate::grid::CanonicalGrid;

/// One fully-populated snapshot of the grid for one feature at one
/// timestamp.
///
/// Every cell holds either a value or the `f32::NAN` no-data sentinel;
/// there are no implicit gaps. Frames are immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct GridFrame {
    feature: String,
    time: TimeBucket,
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl GridFrame {
    /// Construct a frame from row-major data.
    pub fn new(
        feature: impl Into<String>,
        time: TimeBucket,
        rows: usize,
        cols: usize,
        data: Vec<f32>,
    ) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(GridError::ShapeMismatch {
                expected_rows: rows,
                expected_cols: cols,
                actual: data.len(),
            });
        }
        Ok(Self {
            feature: feature.into(),
            time,
            rows,
            cols,
            data,
        })
    }

    /// A frame of the given grid's shape composed entirely of the no-data
    /// sentinel.
    pub fn sentinel(feature: impl Into<String>, time: TimeBucket, grid: &CanonicalGrid) -> Self {
        Self {
            feature: feature.into(),
            time,
            rows: grid.rows(),
            cols: grid.cols(),
            data: vec![f32::NAN; grid.cell_count()],
        }
    }

    pub fn feature(&self) -> &str {
        &self.feature
    }

    pub fn time(&self) -> TimeBucket {
        self.time
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Raw row-major cell data, sentinel included.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Raw cell value, sentinel included; `None` only for an out-of-bounds
    /// index.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(row * self.cols + col).copied()
    }

    /// Cell value with the sentinel mapped to `None`.
    pub fn value(&self, row: usize, col: usize) -> Option<f32> {
        self.get(row, col).filter(|v| !v.is_nan())
    }

    /// Whether a cell holds the no-data sentinel.
    pub fn is_missing(&self, row: usize, col: usize) -> bool {
        self.get(row, col).map_or(true, f32::is_nan)
    }

    /// Fraction of cells holding a value (0.0 - 1.0).
    pub fn coverage(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let filled = self.data.iter().filter(|v| !v.is_nan()).count();
        filled as f64 / self.data.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time() -> TimeBucket {
        TimeBucket::year(1990)
    }

    #[test]
    fn test_shape_is_enforced() {
        let err = GridFrame::new("t", time(), 2, 3, vec![0.0; 5]).unwrap_err();
        assert!(matches!(err, GridError::ShapeMismatch { actual: 5, .. }));

        assert!(GridFrame::new("t", time(), 2, 3, vec![0.0; 6]).is_ok());
    }

    #[test]
    fn test_sentinel_frame_is_fully_missing() {
        let grid = CanonicalGrid::global(5.0).unwrap();
        let frame = GridFrame::sentinel("t", time(), &grid);

        assert_eq!(frame.shape(), grid.shape());
        assert_eq!(frame.coverage(), 0.0);
        assert!(frame.is_missing(0, 0));
        assert_eq!(frame.value(0, 0), None);
    }

    #[test]
    fn test_value_distinguishes_sentinel_from_zero() {
        let frame =
            GridFrame::new("t", time(), 1, 2, vec![0.0, f32::NAN]).unwrap();

        assert_eq!(frame.value(0, 0), Some(0.0));
        assert_eq!(frame.value(0, 1), None);
        assert_eq!(frame.get(0, 1).map(f32::is_nan), Some(true));
        assert!(!frame.is_missing(0, 0));
        assert!(frame.is_missing(0, 1));
    }

    #[test]
    fn test_out_of_bounds() {
        let frame = GridFrame::new("t", time(), 1, 1, vec![1.0]).unwrap();
        assert_eq!(frame.get(1, 0), None);
        assert_eq!(frame.get(0, 1), None);
    }
}
