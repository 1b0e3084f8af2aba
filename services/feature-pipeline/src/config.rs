//! Pipeline configuration.
//!
//! Loaded from an optional YAML file, then overridden by environment
//! variables. Defaults mirror the historical NOAA run: pressure levels
//! 200/150/100/70 mb averaged into the aloft column, records cut to
//! 1965 onward, a 2.5 degree global grid.

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use climate_common::TimeBucket;
use interpolation::InterpolationConfig;
use serde::{Deserialize, Serialize};

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Canonical grid settings.
    pub grid: GridConfig,

    /// Interpolation engine tuning.
    pub interpolation: InterpolationConfig,

    /// Station record selection.
    pub source: SourceConfig,

    /// Output feature naming and units.
    pub features: FeatureConfig,

    /// Reference period for anomaly normalization, if used.
    pub reference: Option<ReferencePeriod>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Degrees per cell on the global grid.
    pub resolution: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Source identifier stamped on observations.
    pub id: String,

    /// Records before this year are dropped.
    pub start_year: i32,

    /// Pressure levels (mb) averaged into the aloft column.
    pub pressure_levels: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Name of the interpolated surface series.
    pub surface: String,

    /// Name of the interpolated aloft series.
    pub aloft: String,

    /// Physical units stamped on series metadata.
    pub units: String,
}

/// Inclusive reference period for anomaly baselines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferencePeriod {
    pub start: TimeBucket,
    pub end: TimeBucket,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            interpolation: InterpolationConfig::default(),
            source: SourceConfig::default(),
            features: FeatureConfig::default(),
            reference: None,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { resolution: 2.5 }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            id: "noaa-ratpac".to_string(),
            start_year: 1965,
            pressure_levels: vec![200.0, 150.0, 100.0, 70.0],
        }
    }
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            surface: "surface".to_string(),
            aloft: "aloft".to_string(),
            units: "degC".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration: file if given, defaults otherwise, then
    /// environment overrides, then validation.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config file {}", path.display()))?;
                serde_yaml::from_str(&text)
                    .with_context(|| format!("parsing config file {}", path.display()))?
            }
            None => Self::default(),
        };

        config.apply_env();
        config
            .validate()
            .map_err(|reason| anyhow::anyhow!("invalid configuration: {reason}"))?;
        Ok(config)
    }

    /// Environment variable overrides for the common tuning knobs.
    fn apply_env(&mut self) {
        if let Ok(val) = env::var("GRID_RESOLUTION") {
            if let Ok(resolution) = val.parse() {
                self.grid.resolution = resolution;
            }
        }
        if let Ok(val) = env::var("SEARCH_RADIUS_DEG") {
            if let Ok(radius) = val.parse() {
                self.interpolation.search_radius_deg = radius;
            }
        }
        if let Ok(val) = env::var("IDW_POWER") {
            if let Ok(power) = val.parse() {
                self.interpolation.power = power;
            }
        }
        if let Ok(val) = env::var("START_YEAR") {
            if let Ok(year) = val.parse() {
                self.source.start_year = year;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.grid.resolution.is_finite() || self.grid.resolution <= 0.0 {
            return Err(format!(
                "grid resolution must be positive, got {}",
                self.grid.resolution
            ));
        }
        self.interpolation.validate()?;

        if self.source.pressure_levels.is_empty() {
            return Err("at least one pressure level is required".to_string());
        }
        if self
            .source
            .pressure_levels
            .iter()
            .any(|&p| !p.is_finite() || p <= 1.0)
        {
            return Err("pressure levels must be finite and above 1 mb".to_string());
        }

        if self.features.surface == self.features.aloft {
            return Err("surface and aloft feature names must differ".to_string());
        }

        if let Some(reference) = &self.reference {
            if reference.end < reference.start {
                return Err(format!(
                    "reference period end {} precedes start {}",
                    reference.end, reference.start
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_yaml_round_trip_with_partial_file() {
        let yaml = "
grid:
  resolution: 5.0
source:
  start_year: 1970
reference:
  start: \"1970\"
  end: \"1979\"
";
        let config: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.grid.resolution, 5.0);
        assert_eq!(config.source.start_year, 1970);
        // Unspecified sections keep defaults
        assert_eq!(config.source.pressure_levels, vec![200.0, 150.0, 100.0, 70.0]);
        assert_eq!(config.features.surface, "surface");
        assert!(config.validate().is_ok());

        let reference = config.reference.unwrap();
        assert_eq!(reference.start, TimeBucket::year(1970));
        assert_eq!(reference.end, TimeBucket::year(1979));
    }

    #[test]
    fn test_validation_rejects_bad_reference_period() {
        let mut config = PipelineConfig::default();
        config.reference = Some(ReferencePeriod {
            start: TimeBucket::year(1990),
            end: TimeBucket::year(1980),
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_rejects_colliding_feature_names() {
        let mut config = PipelineConfig::default();
        config.features.aloft = config.features.surface.clone();
        assert!(config.validate().is_err());
    }
}
