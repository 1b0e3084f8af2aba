//! Pipeline stages wiring the stores to the numerical core.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use climate_common::{Observation, SourceId, StationRecord, TimeBucket};
use feature_store::{FeatureStore, FsFeatureStore, FsObservationSource, ObservationSource};
use features::{aloft_observation, anomaly, combine, surface_observation, CombineOp};
use grid_model::CanonicalGrid;
use interpolation::{interpolate_series, screen_observations, CancelToken};
use tracing::info;

use crate::config::PipelineConfig;

/// Interpolate the surface and aloft series from station records and
/// persist both.
pub fn run_interpolate(
    config: &PipelineConfig,
    input_dir: &Path,
    output_dir: &Path,
    cancel: &CancelToken,
) -> Result<()> {
    let grid = CanonicalGrid::global(config.grid.resolution)?;
    let store = FsFeatureStore::new(output_dir);
    let source_id = SourceId::new(config.source.id.clone());

    let records = FsObservationSource::new(input_dir)
        .load()
        .context("loading station records")?;
    let records: Vec<StationRecord> = records
        .into_iter()
        .filter(|record| record.year >= config.source.start_year)
        .collect();
    info!(
        records = records.len(),
        start_year = config.source.start_year,
        "station records after start-year cutoff"
    );

    let (surface, rejected_surface) =
        screen_observations(records.iter().filter_map(|r| surface_observation(r, &source_id)));
    let (aloft, rejected_aloft) = screen_observations(
        records
            .iter()
            .filter_map(|r| aloft_observation(r, &config.source.pressure_levels, &source_id)),
    );
    info!(
        surface = surface.len(),
        aloft = aloft.len(),
        rejected = rejected_surface + rejected_aloft,
        "screened observations"
    );

    let surface_series = interpolate_series(
        &grid,
        &config.features.surface,
        &config.features.units,
        group_by_time(surface),
        &config.interpolation,
        cancel,
    )?;
    store.put_series(&surface_series)?;

    let aloft_series = interpolate_series(
        &grid,
        &config.features.aloft,
        &config.features.units,
        group_by_time(aloft),
        &config.interpolation,
        cancel,
    )?;
    store.put_series(&aloft_series)?;

    info!(
        surface_frames = surface_series.len(),
        aloft_frames = aloft_series.len(),
        "interpolation complete"
    );
    Ok(())
}

/// Derive `minuend - subtrahend` from two stored series, optionally
/// normalizing each input to its anomaly baseline first.
pub fn run_derive(
    config: &PipelineConfig,
    store_dir: &Path,
    minuend: &str,
    subtrahend: &str,
    output: &str,
    normalize: bool,
) -> Result<()> {
    let store = FsFeatureStore::new(store_dir);

    let mut a = store
        .get_series(minuend)
        .with_context(|| format!("loading series {minuend}"))?;
    let mut b = store
        .get_series(subtrahend)
        .with_context(|| format!("loading series {subtrahend}"))?;

    if normalize {
        let reference = config
            .reference
            .as_ref()
            .context("anomaly normalization requires a reference period in the config")?;
        let period = (reference.start, reference.end);
        a = anomaly(format!("{minuend}-anomaly"), &a, period)?;
        b = anomaly(format!("{subtrahend}-anomaly"), &b, period)?;
    }

    let derived = combine(CombineOp::Difference, output, &a, &b)?;
    store.put_series(&derived)?;

    info!(
        output,
        frames = derived.len(),
        minuend,
        subtrahend,
        normalized = normalize,
        "derived feature stored"
    );
    Ok(())
}

/// Partition observations into per-timestamp batches.
fn group_by_time(observations: Vec<Observation>) -> BTreeMap<TimeBucket, Vec<Observation>> {
    let mut grouped: BTreeMap<TimeBucket, Vec<Observation>> = BTreeMap::new();
    for obs in observations {
        grouped.entry(obs.time()).or_default().push(obs);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap as Map;
    use std::fs;

    fn record(station: &str, year: i32, lat: f64, lon: f64, surface: f64) -> StationRecord {
        let mut levels = Map::new();
        levels.insert("200mb".to_string(), surface - 1.0);
        levels.insert("70mb".to_string(), surface - 2.0);
        StationRecord {
            station_id: station.to_string(),
            lat,
            lon,
            year,
            month: None,
            surface: Some(surface),
            levels,
        }
    }

    fn write_records(dir: &Path, records: &[StationRecord]) {
        fs::write(
            dir.join("stations.json"),
            serde_json::to_vec(&records).unwrap(),
        )
        .unwrap();
    }

    fn config() -> PipelineConfig {
        let mut config = PipelineConfig::default();
        config.grid.resolution = 5.0;
        config.interpolation.search_radius_deg = 10.0;
        config
    }

    #[test]
    fn test_interpolate_then_derive_end_to_end() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();

        let records: Vec<StationRecord> = (0..4)
            .map(|i| record(&format!("S{i}"), 1990, 2.5, -2.5 + 5.0 * i as f64, 10.0))
            .collect();
        write_records(input.path(), &records);

        let config = config();
        run_interpolate(&config, input.path(), output.path(), &CancelToken::new()).unwrap();

        let store = FsFeatureStore::new(output.path());
        assert_eq!(store.list_features().unwrap(), vec!["aloft", "surface"]);

        run_derive(
            &config,
            output.path(),
            "surface",
            "aloft",
            "surface-minus-aloft",
            false,
        )
        .unwrap();

        let derived = store.get_series("surface-minus-aloft").unwrap();
        assert_eq!(derived.len(), 1);

        // Surface 10.0, aloft log-weighted mean of 9.0 and 8.0; the
        // difference at a station cell is surface minus that mean
        let grid = CanonicalGrid::global(5.0).unwrap();
        let (row, col) = grid.cell_index(2.5, -2.5).unwrap();
        let value = derived.frames()[0].value(row, col).unwrap() as f64;
        assert!(value > 1.0 && value < 2.0, "unexpected differential {value}");

        // Cells outside every search radius stay missing in the
        // derived series too
        let (row, col) = grid.cell_index(-60.0, 100.0).unwrap();
        assert!(derived.frames()[0].is_missing(row, col));
    }

    #[test]
    fn test_start_year_cutoff_drops_old_records() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();

        write_records(
            input.path(),
            &[
                record("OLD", 1950, 2.5, -2.5, 1.0),
                record("NEW", 1990, 2.5, -2.5, 2.0),
            ],
        );

        let config = config();
        run_interpolate(&config, input.path(), output.path(), &CancelToken::new()).unwrap();

        let store = FsFeatureStore::new(output.path());
        let surface = store.get_series("surface").unwrap();
        let times: Vec<String> = surface.times().map(|t| t.to_string()).collect();
        assert_eq!(times, vec!["1990"]);
    }

    #[test]
    fn test_derive_with_normalization_requires_reference() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_records(input.path(), &[record("S", 1990, 2.5, -2.5, 3.0)]);

        let config = config();
        run_interpolate(&config, input.path(), output.path(), &CancelToken::new()).unwrap();

        let err = run_derive(
            &config,
            output.path(),
            "surface",
            "aloft",
            "out",
            true,
        )
        .unwrap_err();
        assert!(err.to_string().contains("reference period"));
    }
}
