//! Single-timestamp interpolation of observations onto the grid.

use climate_common::{Observation, ObservationError, TimeBucket};
use grid_model::{CanonicalGrid, GridFrame};
use tracing::{debug, warn};

use crate::config::InterpolationConfig;
use crate::distance::central_angle_deg;
use crate::error::{InterpolationError, Result};
use crate::smoothing::smooth_frame;

/// Validate candidate observations, excluding the malformed ones.
///
/// A malformed record is a local condition: it is logged and dropped, and
/// the rest of the batch proceeds as if it never existed. Returns the kept
/// observations and the rejection count.
pub fn screen_observations<I>(candidates: I) -> (Vec<Observation>, usize)
where
    I: IntoIterator<Item = std::result::Result<Observation, ObservationError>>,
{
    let mut kept = Vec::new();
    let mut rejected = 0usize;

    for candidate in candidates {
        match candidate {
            Ok(obs) => kept.push(obs),
            Err(err) => {
                rejected += 1;
                warn!(error = %err, "excluding invalid observation");
            }
        }
    }

    if rejected > 0 {
        warn!(rejected, kept = kept.len(), "observation screening dropped records");
    }
    (kept, rejected)
}

/// Interpolate one timestamp's observations into a dense frame.
///
/// Cells containing an observation take the (mean of the) direct
/// observation value exactly. Every other cell takes the inverse-distance
/// weighted mean of observations within the search radius of its center,
/// measured as the great-circle central angle. Cells with no observation
/// in radius keep the no-data sentinel. An empty observation set yields a
/// fully-sentinel frame, not an error.
pub fn interpolate_frame(
    grid: &CanonicalGrid,
    feature: &str,
    time: TimeBucket,
    observations: &[Observation],
    config: &InterpolationConfig,
) -> Result<GridFrame> {
    config
        .validate()
        .map_err(InterpolationError::InvalidConfig)?;

    for obs in observations {
        if obs.time() != time {
            return Err(InterpolationError::TimestampMismatch {
                expected: time.to_string(),
                actual: obs.time().to_string(),
            });
        }
    }

    if observations.is_empty() {
        return Ok(GridFrame::sentinel(feature, time, grid));
    }

    let (rows, cols) = grid.shape();
    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); grid.cell_count()];
    for (i, obs) in observations.iter().enumerate() {
        let (row, col) = grid.cell_index(obs.lat(), obs.lon())?;
        buckets[row * cols + col].push(i);
    }

    let mut data = vec![f32::NAN; grid.cell_count()];

    // Direct hits first: these cells are determined by their own
    // observations and bypass distance weighting entirely.
    for (flat, bucket) in buckets.iter().enumerate() {
        if bucket.is_empty() {
            continue;
        }
        let sum: f64 = bucket.iter().map(|&i| observations[i].value()).sum();
        data[flat] = (sum / bucket.len() as f64) as f32;
    }

    let radius = config.search_radius_deg;
    let res = grid.resolution();
    let wrap = grid.wraps_longitude();
    let row_reach = (radius / res).ceil() as isize;

    for row in 0..rows {
        for col in 0..cols {
            let flat = row * cols + col;
            if !data[flat].is_nan() {
                continue;
            }

            let (cell_lat, cell_lon) = grid.cell_center(row, col);
            let mut weighted_sum = 0.0f64;
            let mut weight_total = 0.0f64;
            let mut in_radius = 0usize;

            let mut visit = |flat_cell: usize| {
                for &i in &buckets[flat_cell] {
                    let obs = &observations[i];
                    let d = central_angle_deg(cell_lat, cell_lon, obs.lat(), obs.lon());
                    if d <= radius {
                        let w = 1.0 / (d.powf(config.power) + config.epsilon);
                        weighted_sum += w * obs.value();
                        weight_total += w;
                        in_radius += 1;
                    }
                }
            };

            for dr in -row_reach..=row_reach {
                let cand_row = row as isize + dr;
                if cand_row < 0 || cand_row >= rows as isize {
                    continue;
                }
                let cand_row = cand_row as usize;

                let reach = col_reach(
                    radius,
                    res,
                    poleward_band_lat(grid, row),
                    poleward_band_lat(grid, cand_row),
                    cols,
                );

                if 2 * reach + 1 >= cols {
                    for cand_col in 0..cols {
                        visit(cand_row * cols + cand_col);
                    }
                } else if wrap {
                    for dc in -(reach as isize)..=(reach as isize) {
                        let cand_col = (col as isize + dc).rem_euclid(cols as isize) as usize;
                        visit(cand_row * cols + cand_col);
                    }
                } else {
                    let lo = col.saturating_sub(reach);
                    let hi = (col + reach).min(cols - 1);
                    for cand_col in lo..=hi {
                        visit(cand_row * cols + cand_col);
                    }
                }
            }

            if in_radius >= config.min_observations && weight_total > 0.0 {
                data[flat] = (weighted_sum / weight_total) as f32;
            }
        }
    }

    if let Some(window) = config.smoothing_window {
        data = smooth_frame(&data, rows, cols, window, wrap);
    }

    let frame = GridFrame::new(feature, time, rows, cols, data)?;
    debug!(
        feature,
        time = %time,
        observations = observations.len(),
        coverage = frame.coverage(),
        "interpolated frame"
    );
    Ok(frame)
}

/// The latitude of a row band's most poleward extent.
///
/// Used to bound the longitude window conservatively: cosine is smallest
/// there, so the window it implies covers the whole band.
fn poleward_band_lat(grid: &CanonicalGrid, row: usize) -> f64 {
    let hi = grid.domain().max_lat - row as f64 * grid.resolution();
    let lo = hi - grid.resolution();
    if hi.abs() >= lo.abs() {
        hi
    } else {
        lo
    }
}

/// How many columns to scan either side of a cell so that every point
/// within `radius_deg` of it is covered, given the target and candidate
/// row band latitudes.
///
/// Derived from the haversine identity: for central angle <= r,
/// sin^2(dlon/2) <= sin^2(r/2) / (cos(lat_a) * cos(lat_b)). Returns the
/// full column count when the bound degenerates near a pole.
fn col_reach(radius_deg: f64, res: f64, lat_a: f64, lat_b: f64, cols: usize) -> usize {
    let cos_product = lat_a.to_radians().cos() * lat_b.to_radians().cos();
    if cos_product <= 1e-12 {
        return cols;
    }

    let s = (radius_deg.to_radians() / 2.0).sin() / cos_product.sqrt();
    if s >= 1.0 {
        return cols;
    }

    let max_dlon_deg = (2.0 * s.asin()).to_degrees();
    // One extra cell: observations sit anywhere inside their cell, not at
    // its center.
    ((max_dlon_deg / res).ceil() as usize).saturating_add(1)
}
