//! Feature derivation layer.
//!
//! Builds derived grid series from interpolated source series: per-cell
//! elementwise combination ([`combine`]), normalization to an anomaly
//! baseline ([`anomaly`]), and the pressure-weighted column average that
//! collapses multi-level station profiles into a single "aloft" value.
//!
//! The no-data sentinel is absorbing throughout: a missing input cell
//! yields a missing output cell and is never silently treated as zero.

pub mod aloft;
pub mod anomaly;
pub mod combine;
pub mod error;

pub use aloft::{aloft_observation, pressure_weighted_mean, surface_observation};
pub use anomaly::{anomaly, reference_mean};
pub use combine::{combine, CombineOp};
pub use error::{FeatureError, Result};
