//! Great-circle distance on the sphere.
//!
//! Distances are expressed as central angles in degrees, the same unit as
//! the grid resolution and search radius. Spherical distance avoids the
//! longitude-compression distortion a planar approximation develops near
//! the poles.

/// Central angle between two geographic points, in degrees, via the
/// haversine formula.
pub fn central_angle_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);

    // Rounding can push `a` a hair outside [0, 1] for near-antipodal points
    let a = a.clamp(0.0, 1.0);

    (2.0 * a.sqrt().asin()).to_degrees()
}
