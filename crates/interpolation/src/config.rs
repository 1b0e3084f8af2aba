//! Interpolation engine configuration.

use serde::{Deserialize, Serialize};

/// Tuning parameters for the inverse-distance-weighted engine.
///
/// The radius and power are visualization-tuning knobs, not correctness
/// requirements; they are configuration rather than constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolationConfig {
    /// Neighborhood cutoff as a great-circle central angle in degrees.
    /// Observations farther than this from a cell center do not contribute
    /// to it.
    pub search_radius_deg: f64,

    /// Inverse-distance power `p` in `1 / (d^p + epsilon)`.
    pub power: f64,

    /// Small positive term keeping weights finite at zero distance.
    pub epsilon: f64,

    /// Minimum observations in radius for a cell to receive a value;
    /// below this the cell keeps the no-data sentinel.
    pub min_observations: usize,

    /// Odd window width for the optional post-interpolation smoothing
    /// pass; `None` disables smoothing.
    pub smoothing_window: Option<usize>,
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        Self {
            search_radius_deg: 15.0,
            power: 2.0,
            epsilon: 1e-6,
            min_observations: 1,
            smoothing_window: None,
        }
    }
}

impl InterpolationConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.search_radius_deg.is_finite() || self.search_radius_deg <= 0.0 {
            return Err(format!(
                "search_radius_deg must be positive, got {}",
                self.search_radius_deg
            ));
        }
        if self.search_radius_deg > 180.0 {
            return Err(format!(
                "search_radius_deg must be at most 180, got {}",
                self.search_radius_deg
            ));
        }
        if !self.power.is_finite() || self.power <= 0.0 {
            return Err(format!("power must be positive, got {}", self.power));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(format!("epsilon must be positive, got {}", self.epsilon));
        }
        if self.min_observations == 0 {
            return Err("min_observations must be at least 1".to_string());
        }
        if let Some(window) = self.smoothing_window {
            if window < 3 || window % 2 == 0 {
                return Err(format!(
                    "smoothing_window must be an odd number >= 3, got {window}"
                ));
            }
        }
        Ok(())
    }
}
