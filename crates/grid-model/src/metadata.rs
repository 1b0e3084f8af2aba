//! Grid metadata persisted alongside feature series.
//!
//! Carries everything a renderer needs to reproduce cell coordinates
//! without recomputation: feature identity, units, resolution, domain and
//! shape.

use climate_common::GeoDomain;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::grid::CanonicalGrid;

/// Metadata record shared by all frames of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridMetadata {
    /// Feature identifier (e.g. `"surface"`, `"surface-minus-aloft"`).
    pub feature: String,
    /// Physical units (e.g. `"degC"` for temperature anomalies).
    pub units: String,
    /// Angular resolution in degrees per cell.
    pub resolution: f64,
    /// Geographic domain of the grid.
    pub domain: GeoDomain,
    /// Grid shape as (rows, cols).
    pub shape: (usize, usize),
    /// Fill value for missing cells; `None` encodes the NaN sentinel,
    /// which JSON cannot represent directly.
    pub fill_value: Option<f32>,
}

impl GridMetadata {
    /// Metadata describing a series on the given grid, with the NaN
    /// sentinel.
    pub fn for_grid(
        feature: impl Into<String>,
        units: impl Into<String>,
        grid: &CanonicalGrid,
    ) -> Self {
        Self {
            feature: feature.into(),
            units: units.into(),
            resolution: grid.resolution(),
            domain: grid.domain(),
            shape: grid.shape(),
            fill_value: None,
        }
    }

    /// Reconstruct the canonical grid this metadata describes.
    pub fn grid(&self) -> Result<CanonicalGrid> {
        CanonicalGrid::new(self.resolution, self.domain)
    }

    /// Same mesh: resolution, domain and shape all agree.
    pub fn same_grid(&self, other: &GridMetadata) -> bool {
        self.resolution == other.resolution
            && self.domain == other.domain
            && self.shape == other.shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_round_trip() {
        let grid = CanonicalGrid::global(2.5).unwrap();
        let meta = GridMetadata::for_grid("surface", "degC", &grid);

        assert_eq!(meta.shape, (72, 144));
        assert_eq!(meta.grid().unwrap(), grid);
    }

    #[test]
    fn test_same_grid() {
        let g25 = CanonicalGrid::global(2.5).unwrap();
        let g50 = CanonicalGrid::global(5.0).unwrap();

        let a = GridMetadata::for_grid("a", "degC", &g25);
        let b = GridMetadata::for_grid("b", "degC", &g25);
        let c = GridMetadata::for_grid("c", "degC", &g50);

        assert!(a.same_grid(&b));
        assert!(!a.same_grid(&c));
    }

    #[test]
    fn test_json_sentinel_is_null() {
        let grid = CanonicalGrid::global(5.0).unwrap();
        let meta = GridMetadata::for_grid("surface", "degC", &grid);

        let json = serde_json::to_value(&meta).unwrap();
        assert!(json["fill_value"].is_null());

        let back: GridMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(back, meta);
    }
}
