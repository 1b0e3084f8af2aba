//! Unvalidated station records as produced by the processed-record
//! normalizer collaborator.
//!
//! A [`StationRecord`] is the on-disk document shape: one station, one
//! monthly bucket, a surface temperature anomaly and per-pressure-level
//! anomalies. Validation into [`crate::Observation`] happens downstream so
//! that a malformed record can be rejected individually.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::time::{TimeBucket, TimeBucketParseError};

/// One normalized station sample, straight from the processed record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    /// Upstream station identifier.
    pub station_id: String,
    /// Station latitude in degrees.
    pub lat: f64,
    /// Station longitude; either [-180, 180) or [0, 360) convention.
    pub lon: f64,
    /// Calendar year of the sample.
    pub year: i32,
    /// Calendar month (1-12), absent for yearly records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    /// Surface value, if the station reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surface: Option<f64>,
    /// Per-pressure-level values keyed by level name (e.g. `"200mb"`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub levels: BTreeMap<String, f64>,
}

impl StationRecord {
    /// The time bucket this record falls into.
    pub fn time(&self) -> Result<TimeBucket, TimeBucketParseError> {
        match self.month {
            Some(m) => TimeBucket::month(self.year, m),
            None => Ok(TimeBucket::year(self.year)),
        }
    }

    /// Look up a pressure level by name, case-insensitively and with or
    /// without the `mb` suffix (`"200"` and `"200mb"` both match).
    pub fn level(&self, name: &str) -> Option<f64> {
        let want = name.trim().trim_end_matches("mb").trim();
        self.levels
            .iter()
            .find(|(k, _)| k.trim().trim_end_matches("mb").trim() == want)
            .map(|(_, v)| *v)
    }
}
