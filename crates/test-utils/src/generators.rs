//! Generators for synthetic observations, frames and series.
//!
//! The generated patterns are predictable so tests can verify data is
//! carried through the pipeline cell-for-cell.

use climate_common::{Observation, SourceId, TimeBucket};
use grid_model::{CanonicalGrid, GridFrame, GridMetadata, GridSeries};

/// Build a validated observation, panicking on invalid inputs.
///
/// Test-only convenience; production code goes through
/// `Observation::new` and handles the error.
pub fn observation(lat: f64, lon: f64, time: TimeBucket, value: f64) -> Observation {
    Observation::new(lat, lon, time, value, SourceId::from("test"))
        .expect("generator produced an invalid observation")
}

/// One observation at every `stride`-th cell center, valued by the
/// supplied function of (row, col).
pub fn cell_center_observations(
    grid: &CanonicalGrid,
    time: TimeBucket,
    stride: usize,
    value_fn: impl Fn(usize, usize) -> f64,
) -> Vec<Observation> {
    let mut observations = Vec::new();
    for row in (0..grid.rows()).step_by(stride.max(1)) {
        for col in (0..grid.cols()).step_by(stride.max(1)) {
            let (lat, lon) = grid.cell_center(row, col);
            observations.push(observation(lat, lon, time, value_fn(row, col)));
        }
    }
    observations
}

/// A frame whose cell (row, col) holds `offset + row * 1000 + col`,
/// making misplaced cells obvious in failures.
pub fn ramp_frame(grid: &CanonicalGrid, feature: &str, time: TimeBucket, offset: f32) -> GridFrame {
    let (rows, cols) = grid.shape();
    let mut data = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            data.push(offset + (row * 1000 + col) as f32);
        }
    }
    GridFrame::new(feature, time, rows, cols, data).expect("generator shape mismatch")
}

/// Like [`ramp_frame`], with every `gap_stride`-th cell holding the
/// no-data sentinel.
pub fn ramp_frame_with_gaps(
    grid: &CanonicalGrid,
    feature: &str,
    time: TimeBucket,
    offset: f32,
    gap_stride: usize,
) -> GridFrame {
    let (rows, cols) = grid.shape();
    let mut data = Vec::with_capacity(rows * cols);
    for i in 0..rows * cols {
        if gap_stride > 0 && i % gap_stride == 0 {
            data.push(f32::NAN);
        } else {
            let (row, col) = (i / cols, i % cols);
            data.push(offset + (row * 1000 + col) as f32);
        }
    }
    GridFrame::new(feature, time, rows, cols, data).expect("generator shape mismatch")
}

/// A ramp series with one frame per year, each offset by the year so
/// frames are distinguishable.
pub fn ramp_series(grid: &CanonicalGrid, feature: &str, years: &[i32]) -> GridSeries {
    let metadata = GridMetadata::for_grid(feature, "degC", grid);
    let mut sorted = years.to_vec();
    sorted.sort_unstable();
    let frames = sorted
        .iter()
        .map(|&year| ramp_frame_with_gaps(grid, feature, TimeBucket::year(year), year as f32, 7))
        .collect();
    GridSeries::new(metadata, frames).expect("generator produced an invalid series")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_center_observations_land_in_their_cells() {
        let grid = CanonicalGrid::global(5.0).unwrap();
        let time = TimeBucket::year(1990);
        let observations = cell_center_observations(&grid, time, 12, |row, col| {
            (row + col) as f64
        });

        assert!(!observations.is_empty());
        for obs in &observations {
            let (row, col) = grid.cell_index(obs.lat(), obs.lon()).unwrap();
            assert_eq!(obs.value(), (row + col) as f64);
        }
    }

    #[test]
    fn test_ramp_series_is_ordered_and_gapped() {
        let grid = CanonicalGrid::global(10.0).unwrap();
        let series = ramp_series(&grid, "t", &[1992, 1990, 1991]);

        assert_eq!(series.len(), 3);
        let times: Vec<_> = series.times().collect();
        assert!(times.windows(2).all(|w| w[0] < w[1]));
        assert!(series.frames()[0].coverage() < 1.0);
    }
}
