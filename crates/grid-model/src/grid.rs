//! The canonical lat/lon grid.

use climate_common::GeoDomain;

use crate::error::{GridError, Result};

/// A fixed regular mesh over a geographic domain.
///
/// Row 0 is the northernmost latitude band; cells are stored row-major.
/// The mapping between coordinates and cells is deterministic: a coordinate
/// exactly on a cell boundary belongs to the lower-indexed cell.
/// Reconstructed from persisted metadata via [`crate::GridMetadata::grid`],
/// never deserialized directly, so the construction invariants always hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanonicalGrid {
    resolution: f64,
    domain: GeoDomain,
    rows: usize,
    cols: usize,
}

impl CanonicalGrid {
    /// Create a grid with the given angular resolution (degrees per cell,
    /// both axes) over a domain.
    ///
    /// The resolution must divide both domain spans into a whole number of
    /// cells; a 2.5 degree global grid is 72x144.
    pub fn new(resolution: f64, domain: GeoDomain) -> Result<Self> {
        let span_lat = domain.height();
        let span_lon = domain.width();

        let invalid = || GridError::InvalidResolution {
            resolution,
            span_lat,
            span_lon,
        };

        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(invalid());
        }
        if span_lat <= 0.0 || span_lon <= 0.0 {
            return Err(invalid());
        }

        let rows = span_lat / resolution;
        let cols = span_lon / resolution;
        if (rows - rows.round()).abs() > 1e-9 || (cols - cols.round()).abs() > 1e-9 {
            return Err(invalid());
        }

        Ok(Self {
            resolution,
            domain,
            rows: rows.round() as usize,
            cols: cols.round() as usize,
        })
    }

    /// Global grid at the given resolution.
    pub fn global(resolution: f64) -> Result<Self> {
        Self::new(resolution, GeoDomain::global())
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn domain(&self) -> GeoDomain {
        self.domain
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Grid shape as (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Whether grid columns wrap across the antimeridian.
    pub fn wraps_longitude(&self) -> bool {
        self.domain.wraps_longitude()
    }

    /// Map a coordinate to the containing cell.
    ///
    /// Longitude is normalized into [-180, 180) first; coordinates outside
    /// the domain fail with [`GridError::OutOfRange`].
    pub fn cell_index(&self, lat: f64, lon: f64) -> Result<(usize, usize)> {
        let lon = GeoDomain::normalize_lon(lon);

        if !lat.is_finite() || !lon.is_finite() || !self.domain.contains(lat, lon) {
            return Err(GridError::OutOfRange { lat, lon });
        }

        let row = lower_cell((self.domain.max_lat - lat) / self.resolution, self.rows);
        let col = lower_cell((lon - self.domain.min_lon) / self.resolution, self.cols);
        Ok((row, col))
    }

    /// Center coordinate of a cell, the pure inverse of [`cell_index`].
    ///
    /// [`cell_index`]: CanonicalGrid::cell_index
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        let lat = self.domain.max_lat - (row as f64 + 0.5) * self.resolution;
        let lon = self.domain.min_lon + (col as f64 + 0.5) * self.resolution;
        (lat, lon)
    }

    /// Center latitude of a row band.
    pub fn row_lat(&self, row: usize) -> f64 {
        self.domain.max_lat - (row as f64 + 0.5) * self.resolution
    }
}

/// Floor division with boundary ties assigned to the lower-indexed cell.
fn lower_cell(offset: f64, n: usize) -> usize {
    let floored = offset.floor();
    let idx = if offset > 0.0 && offset == floored {
        floored - 1.0
    } else {
        floored
    };
    // The domain max edge lands exactly on n after the tie adjustment only
    // through float fuzz; clamp rather than index past the last cell.
    (idx.max(0.0) as usize).min(n.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_grid_shape() {
        let grid = CanonicalGrid::global(2.5).unwrap();
        assert_eq!(grid.shape(), (72, 144));

        let grid = CanonicalGrid::global(5.0).unwrap();
        assert_eq!(grid.shape(), (36, 72));
    }

    #[test]
    fn test_rejects_non_dividing_resolution() {
        assert!(CanonicalGrid::global(7.0).is_err());
        assert!(CanonicalGrid::global(0.0).is_err());
        assert!(CanonicalGrid::global(-2.5).is_err());
        assert!(CanonicalGrid::global(f64::NAN).is_err());
    }

    #[test]
    fn test_cell_index_corners() {
        let grid = CanonicalGrid::global(2.5).unwrap();

        // North-west corner
        assert_eq!(grid.cell_index(90.0, -180.0).unwrap(), (0, 0));
        // South pole is the bottom edge of the last row
        assert_eq!(grid.cell_index(-90.0, -180.0).unwrap(), (71, 0));
    }

    #[test]
    fn test_boundary_tie_goes_to_lower_index() {
        let grid = CanonicalGrid::global(2.5).unwrap();

        // 87.5N is the boundary between rows 0 and 1
        let (row, _) = grid.cell_index(87.5, 0.0).unwrap();
        assert_eq!(row, 0);

        // -177.5E is the boundary between cols 0 and 1
        let (_, col) = grid.cell_index(0.1, -177.5).unwrap();
        assert_eq!(col, 0);
    }

    #[test]
    fn test_out_of_range() {
        let grid = CanonicalGrid::global(2.5).unwrap();
        assert!(matches!(
            grid.cell_index(90.5, 0.0),
            Err(GridError::OutOfRange { .. })
        ));
        assert!(matches!(
            grid.cell_index(f64::NAN, 0.0),
            Err(GridError::OutOfRange { .. })
        ));
        // Longitude 270 normalizes to -90, which is in range
        assert!(grid.cell_index(0.0, 270.0).is_ok());
    }

    #[test]
    fn test_round_trip_within_one_cell_width() {
        for resolution in [1.0, 2.5, 5.0, 10.0] {
            let grid = CanonicalGrid::global(resolution).unwrap();

            for &(lat, lon) in &[
                (0.0, 0.0),
                (37.3, -122.1),
                (89.9, 179.9),
                (-89.9, -179.9),
                (-45.0, 270.0),
            ] {
                let (row, col) = grid.cell_index(lat, lon).unwrap();
                let (clat, clon) = grid.cell_center(row, col);

                assert!(
                    (clat - lat).abs() <= resolution,
                    "lat round trip off by more than a cell at res {resolution}: {lat} -> {clat}"
                );
                let lon_norm = GeoDomain::normalize_lon(lon);
                assert!(
                    (clon - lon_norm).abs() <= resolution,
                    "lon round trip off by more than a cell at res {resolution}: {lon_norm} -> {clon}"
                );
            }
        }
    }

    #[test]
    fn test_cell_center_inverts_index() {
        let grid = CanonicalGrid::global(2.5).unwrap();
        for row in [0, 35, 71] {
            for col in [0, 70, 143] {
                let (lat, lon) = grid.cell_center(row, col);
                assert_eq!(grid.cell_index(lat, lon).unwrap(), (row, col));
            }
        }
    }
}
