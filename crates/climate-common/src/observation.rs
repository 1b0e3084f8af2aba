//! Validated point observations.
//!
//! An [`Observation`] is a single sparse sample: a geotagged, timestamped
//! physical value from one upstream source. Invariants (finite value,
//! latitude range, canonical longitude) are checked once at construction;
//! the interpolation engine relies on them and never re-checks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::GeoDomain;
use crate::time::TimeBucket;

/// Identifier of an upstream data source (e.g. `"noaa-ratpac"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceId(String);

impl SourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SourceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A single validated observation.
///
/// Immutable once constructed. Longitude is stored in [-180, 180) regardless
/// of the source convention.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    lat: f64,
    lon: f64,
    time: TimeBucket,
    value: f64,
    source: SourceId,
}

impl Observation {
    /// Validate and construct an observation.
    ///
    /// Longitudes in [0, 360) are normalized; latitudes outside [-90, 90]
    /// and non-finite values are rejected.
    pub fn new(
        lat: f64,
        lon: f64,
        time: TimeBucket,
        value: f64,
        source: SourceId,
    ) -> Result<Self, ObservationError> {
        if !value.is_finite() {
            return Err(ObservationError::NonFinite { value });
        }
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(ObservationError::LatitudeOutOfRange { lat });
        }
        if !lon.is_finite() {
            return Err(ObservationError::LongitudeNotFinite { lon });
        }

        Ok(Self {
            lat,
            lon: GeoDomain::normalize_lon(lon),
            time,
            value,
            source,
        })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in [-180, 180).
    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn time(&self) -> TimeBucket {
        self.time
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn source(&self) -> &SourceId {
        &self.source
    }
}

/// Rejection reasons for malformed observations.
///
/// These indicate a bad record, not a bad batch: callers exclude the record
/// and keep going.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ObservationError {
    #[error("non-finite observation value: {value}")]
    NonFinite { value: f64 },

    #[error("latitude outside [-90, 90]: {lat}")]
    LatitudeOutOfRange { lat: f64 },

    #[error("non-finite longitude: {lon}")]
    LongitudeNotFinite { lon: f64 },

    #[error("invalid time bucket: {0}")]
    InvalidTimeBucket(#[from] crate::time::TimeBucketParseError),
}
