//! Geographic domain of the canonical grid, in WGS84 degrees.

use serde::{Deserialize, Serialize};

/// A geographic extent with longitudes in [-180, 180).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoDomain {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl GeoDomain {
    /// Create a new domain.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// The full globe.
    pub fn global() -> Self {
        Self::new(-180.0, -90.0, 180.0, 90.0)
    }

    /// Width in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Height in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Whether this domain spans the full longitude circle, so columns wrap
    /// across the antimeridian.
    pub fn wraps_longitude(&self) -> bool {
        (self.width() - 360.0).abs() < 1e-9
    }

    /// Check if a point is inside the domain (edges inclusive).
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat
            && lat <= self.max_lat
            && lon >= self.min_lon
            && lon <= self.max_lon
    }

    /// Wrap a longitude into [-180, 180).
    ///
    /// Accepts either source convention: [0, 360) and [-180, 180) both map
    /// onto the canonical range.
    pub fn normalize_lon(lon: f64) -> f64 {
        let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
        // rem_euclid can land exactly on 180.0 for inputs like -180.0 - eps
        if wrapped >= 180.0 {
            wrapped - 360.0
        } else {
            wrapped
        }
    }
}

impl Default for GeoDomain {
    fn default() -> Self {
        Self::global()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lon_conventions() {
        assert_eq!(GeoDomain::normalize_lon(0.0), 0.0);
        assert_eq!(GeoDomain::normalize_lon(359.0), -1.0);
        assert_eq!(GeoDomain::normalize_lon(180.0), -180.0);
        assert_eq!(GeoDomain::normalize_lon(-180.0), -180.0);
        assert_eq!(GeoDomain::normalize_lon(540.0), -180.0);
        assert!((GeoDomain::normalize_lon(190.5) - (-169.5)).abs() < 1e-9);
    }

    #[test]
    fn test_global_contains_poles() {
        let d = GeoDomain::global();
        assert!(d.contains(90.0, 0.0));
        assert!(d.contains(-90.0, -180.0));
        assert!(!d.contains(90.1, 0.0));
    }

    #[test]
    fn test_wraps_longitude() {
        assert!(GeoDomain::global().wraps_longitude());
        assert!(!GeoDomain::new(-10.0, -10.0, 10.0, 10.0).wraps_longitude());
    }
}
