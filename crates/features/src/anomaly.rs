//! Anomaly normalization against a reference-period baseline.
//!
//! Raw absolute values from different sources are not directly
//! comparable; expressing each cell as a deviation from its own
//! reference-period mean puts sources on a common footing before any
//! cross-source combination.

use climate_common::TimeBucket;
use grid_model::{GridFrame, GridSeries};
use tracing::info;

use crate::error::{FeatureError, Result};

/// Per-cell mean over the frames inside the inclusive reference period.
///
/// Cells with no valued frame in the period get the no-data sentinel.
pub fn reference_mean(
    series: &GridSeries,
    reference: (TimeBucket, TimeBucket),
) -> Result<Vec<f32>> {
    let (start, end) = reference;
    let cells = series.metadata().shape.0 * series.metadata().shape.1;

    let mut sums = vec![0.0f64; cells];
    let mut counts = vec![0u32; cells];
    let mut frames_in_period = 0usize;

    for frame in series.frames() {
        if frame.time() < start || frame.time() > end {
            continue;
        }
        frames_in_period += 1;
        for (i, &v) in frame.data().iter().enumerate() {
            if !v.is_nan() {
                sums[i] += v as f64;
                counts[i] += 1;
            }
        }
    }

    if frames_in_period == 0 {
        return Err(FeatureError::EmptyReference {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    Ok(sums
        .iter()
        .zip(&counts)
        .map(|(&sum, &count)| {
            if count == 0 {
                f32::NAN
            } else {
                (sum / count as f64) as f32
            }
        })
        .collect())
}

/// Re-express a series as deviations from its reference-period baseline.
///
/// Every frame of the input appears in the output; a cell whose baseline
/// is undefined (no reference data) is sentinel in every output frame.
pub fn anomaly(
    feature: impl Into<String>,
    series: &GridSeries,
    reference: (TimeBucket, TimeBucket),
) -> Result<GridSeries> {
    let baseline = reference_mean(series, reference)?;
    let feature = feature.into();
    let (rows, cols) = series.metadata().shape;

    let frames = series
        .frames()
        .iter()
        .map(|frame| {
            let data = frame
                .data()
                .iter()
                .zip(&baseline)
                .map(|(&v, &base)| {
                    if v.is_nan() || base.is_nan() {
                        f32::NAN
                    } else {
                        v - base
                    }
                })
                .collect();
            GridFrame::new(feature.clone(), frame.time(), rows, cols, data)
        })
        .collect::<grid_model::Result<Vec<_>>>()?;

    let mut metadata = series.metadata().clone();
    metadata.feature = feature.clone();

    info!(
        feature = %feature,
        source = %series.metadata().feature,
        reference_start = %reference.0,
        reference_end = %reference.1,
        "computed anomaly series"
    );

    GridSeries::new(metadata, frames).map_err(FeatureError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use climate_common::GeoDomain;
    use grid_model::{CanonicalGrid, GridMetadata};

    fn series(frames: Vec<(i32, Vec<f32>)>) -> GridSeries {
        let grid = CanonicalGrid::new(1.0, GeoDomain::new(0.0, 0.0, 2.0, 1.0)).unwrap();
        let metadata = GridMetadata::for_grid("t", "degC", &grid);
        let frames = frames
            .into_iter()
            .map(|(year, data)| {
                GridFrame::new("t", TimeBucket::year(year), 1, 2, data).unwrap()
            })
            .collect();
        GridSeries::new(metadata, frames).unwrap()
    }

    fn range(a: i32, b: i32) -> (TimeBucket, TimeBucket) {
        (TimeBucket::year(a), TimeBucket::year(b))
    }

    #[test]
    fn test_baseline_is_reference_period_mean() {
        let s = series(vec![
            (1990, vec![1.0, 10.0]),
            (1991, vec![3.0, 20.0]),
            (2000, vec![100.0, 100.0]),
        ]);

        let baseline = reference_mean(&s, range(1990, 1991)).unwrap();
        assert_eq!(baseline, vec![2.0, 15.0]);
    }

    #[test]
    fn test_anomaly_subtracts_baseline_everywhere() {
        let s = series(vec![
            (1990, vec![1.0, 10.0]),
            (1991, vec![3.0, 20.0]),
            (2000, vec![5.0, 40.0]),
        ]);

        let a = anomaly("t-anom", &s, range(1990, 1991)).unwrap();
        assert_eq!(a.len(), 3);
        assert_eq!(a.frames()[0].data(), &[-1.0, -5.0]);
        assert_eq!(a.frames()[2].data(), &[3.0, 25.0]);
    }

    #[test]
    fn test_cells_without_reference_data_stay_sentinel() {
        let s = series(vec![
            (1990, vec![1.0, f32::NAN]),
            (2000, vec![2.0, 50.0]),
        ]);

        let a = anomaly("t-anom", &s, range(1990, 1990)).unwrap();
        // Cell 1 had no reference data: sentinel in every frame, even
        // where the input had a value
        assert!(a.frames()[0].is_missing(0, 1));
        assert!(a.frames()[1].is_missing(0, 1));
        assert_eq!(a.frames()[1].get(0, 0), Some(1.0));
    }

    #[test]
    fn test_empty_reference_period_is_an_error() {
        let s = series(vec![(1990, vec![1.0, 2.0])]);
        assert!(matches!(
            anomaly("t-anom", &s, range(1900, 1910)),
            Err(FeatureError::EmptyReference { .. })
        ));
    }
}
