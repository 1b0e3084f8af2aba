//! Ordered sequences of grid frames.

use climate_common::TimeBucket;

use crate::error::{GridError, Result};
use crate::frame::GridFrame;
use crate::metadata::GridMetadata;

/// An immutable, timestamp-ordered sequence of frames for one feature.
///
/// All frames share the metadata's grid shape and timestamps are strictly
/// increasing. Timestamps with no data are simply absent; they are never
/// materialized as all-sentinel frames.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSeries {
    metadata: GridMetadata,
    frames: Vec<GridFrame>,
}

impl GridSeries {
    /// Construct from frames already in strictly increasing timestamp
    /// order.
    pub fn new(metadata: GridMetadata, frames: Vec<GridFrame>) -> Result<Self> {
        for pair in frames.windows(2) {
            if pair[1].time() <= pair[0].time() {
                let time = pair[1].time().to_string();
                return Err(if pair[1].time() == pair[0].time() {
                    GridError::DuplicateTimestamp { time }
                } else {
                    GridError::UnorderedSeries { time }
                });
            }
        }
        Self::validated(metadata, frames)
    }

    /// Construct from frames in arbitrary order, e.g. as they complete
    /// across a worker pool. Frames are re-sorted by timestamp; duplicate
    /// timestamps are still an error.
    pub fn from_unordered(metadata: GridMetadata, mut frames: Vec<GridFrame>) -> Result<Self> {
        frames.sort_by_key(GridFrame::time);
        for pair in frames.windows(2) {
            if pair[1].time() == pair[0].time() {
                return Err(GridError::DuplicateTimestamp {
                    time: pair[1].time().to_string(),
                });
            }
        }
        Self::validated(metadata, frames)
    }

    fn validated(metadata: GridMetadata, frames: Vec<GridFrame>) -> Result<Self> {
        for frame in &frames {
            if frame.shape() != metadata.shape {
                return Err(GridError::ShapeMismatch {
                    expected_rows: metadata.shape.0,
                    expected_cols: metadata.shape.1,
                    actual: frame.data().len(),
                });
            }
        }
        Ok(Self { metadata, frames })
    }

    pub fn metadata(&self) -> &GridMetadata {
        &self.metadata
    }

    pub fn frames(&self) -> &[GridFrame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame at an exact timestamp, if present.
    pub fn frame_at(&self, time: TimeBucket) -> Option<&GridFrame> {
        self.frames
            .binary_search_by_key(&time, GridFrame::time)
            .ok()
            .map(|i| &self.frames[i])
    }

    /// Timestamps of all frames, in order.
    pub fn times(&self) -> impl Iterator<Item = TimeBucket> + '_ {
        self.frames.iter().map(GridFrame::time)
    }

    /// First and last timestamps, if any frames exist.
    pub fn span(&self) -> Option<(TimeBucket, TimeBucket)> {
        match (self.frames.first(), self.frames.last()) {
            (Some(first), Some(last)) => Some((first.time(), last.time())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CanonicalGrid;

    fn meta() -> (CanonicalGrid, GridMetadata) {
        let grid = CanonicalGrid::global(5.0).unwrap();
        let meta = GridMetadata::for_grid("t", "degC", &grid);
        (grid, meta)
    }

    fn frame(grid: &CanonicalGrid, year: i32) -> GridFrame {
        GridFrame::sentinel("t", TimeBucket::year(year), grid)
    }

    #[test]
    fn test_rejects_out_of_order() {
        let (grid, meta) = meta();
        let frames = vec![frame(&grid, 1991), frame(&grid, 1990)];
        assert!(matches!(
            GridSeries::new(meta, frames),
            Err(GridError::UnorderedSeries { .. })
        ));
    }

    #[test]
    fn test_rejects_duplicates_even_unordered() {
        let (grid, meta) = meta();
        let frames = vec![frame(&grid, 1990), frame(&grid, 1990)];
        assert!(matches!(
            GridSeries::from_unordered(meta, frames),
            Err(GridError::DuplicateTimestamp { .. })
        ));
    }

    #[test]
    fn test_from_unordered_sorts() {
        let (grid, meta) = meta();
        let frames = vec![frame(&grid, 1992), frame(&grid, 1990), frame(&grid, 1991)];
        let series = GridSeries::from_unordered(meta, frames).unwrap();

        let times: Vec<_> = series.times().collect();
        assert_eq!(
            times,
            vec![
                TimeBucket::year(1990),
                TimeBucket::year(1991),
                TimeBucket::year(1992)
            ]
        );
        assert_eq!(series.span().unwrap().0, TimeBucket::year(1990));
    }

    #[test]
    fn test_rejects_shape_mismatch() {
        let (_, meta) = meta();
        let wrong = GridFrame::new("t", TimeBucket::year(1990), 1, 1, vec![1.0]).unwrap();
        assert!(matches!(
            GridSeries::new(meta, vec![wrong]),
            Err(GridError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_frame_at() {
        let (grid, meta) = meta();
        let frames = vec![frame(&grid, 1990), frame(&grid, 1992)];
        let series = GridSeries::new(meta, frames).unwrap();

        assert!(series.frame_at(TimeBucket::year(1990)).is_some());
        assert!(series.frame_at(TimeBucket::year(1991)).is_none());
    }
}
