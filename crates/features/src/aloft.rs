//! Collapsing multi-level station profiles into point observations.
//!
//! Radiosonde stations report one value per pressure level. The "aloft"
//! feature averages a configured set of levels into a single column
//! value, weighting each level by the natural log of its pressure so
//! that lower (denser) levels count for more. Weights are renormalized
//! over the levels a station actually reported.

use climate_common::{Observation, ObservationError, SourceId, StationRecord};

/// Log-pressure weighted mean over the reported levels.
///
/// `levels` pairs pressure in millibars with the value at that level.
/// Levels with a non-finite value are treated as unreported. Returns
/// `None` when nothing usable is present.
pub fn pressure_weighted_mean(levels: &[(f64, f64)]) -> Option<f64> {
    let mut weight_total = 0.0f64;
    let mut weighted_sum = 0.0f64;

    for &(pressure_mb, value) in levels {
        if pressure_mb <= 1.0 || !pressure_mb.is_finite() || !value.is_finite() {
            continue;
        }
        let w = pressure_mb.ln();
        weight_total += w;
        weighted_sum += w * value;
    }

    if weight_total > 0.0 {
        Some(weighted_sum / weight_total)
    } else {
        None
    }
}

/// Build the surface observation for a station record.
///
/// `None` means the station did not report a surface value; `Some(Err)`
/// means the record is malformed and should be screened out.
pub fn surface_observation(
    record: &StationRecord,
    source: &SourceId,
) -> Option<Result<Observation, ObservationError>> {
    let value = record.surface?;
    Some(build(record, value, source))
}

/// Build the aloft observation for a station record by averaging the
/// configured pressure levels.
///
/// `None` means none of the requested levels were reported.
pub fn aloft_observation(
    record: &StationRecord,
    pressure_levels: &[f64],
    source: &SourceId,
) -> Option<Result<Observation, ObservationError>> {
    let reported: Vec<(f64, f64)> = pressure_levels
        .iter()
        .filter_map(|&p| record.level(&format_level(p)).map(|v| (p, v)))
        .collect();

    let value = pressure_weighted_mean(&reported)?;
    Some(build(record, value, source))
}

fn build(
    record: &StationRecord,
    value: f64,
    source: &SourceId,
) -> Result<Observation, ObservationError> {
    let time = record.time()?;
    Observation::new(record.lat, record.lon, time, value, source.clone())
}

/// Render a pressure value the way level columns are keyed (`"200"`,
/// `"92.5"`).
fn format_level(pressure_mb: f64) -> String {
    if pressure_mb.fract() == 0.0 {
        format!("{}", pressure_mb as i64)
    } else {
        format!("{pressure_mb}")
    }
}
