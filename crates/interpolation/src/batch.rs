//! Parallel interpolation of a whole time series.
//!
//! Each timestamp's interpolation is independent: the grid and the
//! observation sets are read-only, workers share no mutable state, and no
//! unit of work blocks on another. The fan-in re-sorts frames by
//! timestamp so completion order never leaks into the output series.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use climate_common::{Observation, TimeBucket};
use grid_model::{CanonicalGrid, GridMetadata, GridSeries};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::InterpolationConfig;
use crate::engine::interpolate_frame;
use crate::error::{InterpolationError, Result};

/// Cooperative cancellation flag shared between a batch and its caller.
///
/// Checked between per-timestamp units of work; a unit already running is
/// allowed to finish.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the batch.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Interpolate every timestamp of a feature in parallel and assemble the
/// ordered series.
///
/// Timestamps with no observations are omitted from the output series.
/// Cancellation surfaces as [`InterpolationError::Cancelled`]; no partial
/// series is returned.
pub fn interpolate_series(
    grid: &CanonicalGrid,
    feature: &str,
    units: &str,
    observations_by_time: BTreeMap<TimeBucket, Vec<Observation>>,
    config: &InterpolationConfig,
    cancel: &CancelToken,
) -> Result<GridSeries> {
    config
        .validate()
        .map_err(InterpolationError::InvalidConfig)?;

    let units_of_work: Vec<(TimeBucket, Vec<Observation>)> = observations_by_time
        .into_iter()
        .filter(|(time, observations)| {
            if observations.is_empty() {
                debug!(feature, time = %time, "omitting timestamp with no observations");
                false
            } else {
                true
            }
        })
        .collect();

    info!(
        feature,
        timestamps = units_of_work.len(),
        "interpolating series"
    );

    let frames = units_of_work
        .into_par_iter()
        .map(|(time, observations)| {
            if cancel.is_cancelled() {
                return Err(InterpolationError::Cancelled);
            }
            interpolate_frame(grid, feature, time, &observations, config)
        })
        .collect::<Result<Vec<_>>>()?;

    let metadata = GridMetadata::for_grid(feature, units, grid);
    let series = GridSeries::from_unordered(metadata, frames)?;

    info!(feature, frames = series.len(), "series interpolation complete");
    Ok(series)
}
