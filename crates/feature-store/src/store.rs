//! Feature store: persisted grid series for the rendering collaborator.
//!
//! Layout per feature:
//!
//! ```text
//! <root>/<feature>/metadata.json   grid metadata + per-frame index
//! <root>/<feature>/frames.bin      concatenated compressed frames
//! ```
//!
//! The manifest carries everything a renderer needs to reproduce cell
//! coordinates without recomputation; frames round-trip bit-faithfully,
//! sentinel cells included.

use std::fs;
use std::path::PathBuf;

use climate_common::TimeBucket;
use grid_model::{GridFrame, GridMetadata, GridSeries};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::codec::{decode_frame, encode_frame};
use crate::error::{Result, StoreError};

/// Read/write contract for dense feature series.
pub trait FeatureStore {
    /// Persist a series, replacing any previous series for the same
    /// feature.
    fn put_series(&self, series: &GridSeries) -> Result<()>;

    /// Load a feature's series.
    fn get_series(&self, feature: &str) -> Result<GridSeries>;

    /// Names of all stored features.
    fn list_features(&self) -> Result<Vec<String>>;
}

/// Manifest persisted as `metadata.json`.
#[derive(Debug, Serialize, Deserialize)]
struct SeriesManifest {
    metadata: GridMetadata,
    frames: Vec<FrameIndexEntry>,
}

/// Index entry locating one compressed frame inside `frames.bin`.
#[derive(Debug, Serialize, Deserialize)]
struct FrameIndexEntry {
    time: TimeBucket,
    offset: u64,
    len: u64,
}

/// Directory-backed feature store.
#[derive(Debug, Clone)]
pub struct FsFeatureStore {
    root: PathBuf,
}

impl FsFeatureStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn feature_dir(&self, feature: &str) -> Result<PathBuf> {
        if feature.is_empty()
            || feature.starts_with('.')
            || feature.contains('/')
            || feature.contains('\\')
        {
            return Err(StoreError::InvalidFeatureName(feature.to_string()));
        }
        Ok(self.root.join(feature))
    }
}

impl FeatureStore for FsFeatureStore {
    fn put_series(&self, series: &GridSeries) -> Result<()> {
        let feature = &series.metadata().feature;
        let dir = self.feature_dir(feature)?;
        fs::create_dir_all(&dir)?;

        let mut blob = Vec::new();
        let mut index = Vec::with_capacity(series.len());
        for frame in series.frames() {
            let encoded = encode_frame(frame.data())?;
            index.push(FrameIndexEntry {
                time: frame.time(),
                offset: blob.len() as u64,
                len: encoded.len() as u64,
            });
            blob.extend_from_slice(&encoded);
        }

        let manifest = SeriesManifest {
            metadata: series.metadata().clone(),
            frames: index,
        };

        fs::write(dir.join("frames.bin"), &blob)?;
        fs::write(
            dir.join("metadata.json"),
            serde_json::to_vec_pretty(&manifest)?,
        )?;

        info!(
            feature = %feature,
            frames = series.len(),
            bytes = blob.len(),
            "stored feature series"
        );
        Ok(())
    }

    fn get_series(&self, feature: &str) -> Result<GridSeries> {
        let dir = self.feature_dir(feature)?;
        let manifest_path = dir.join("metadata.json");
        if !manifest_path.exists() {
            return Err(StoreError::FeatureNotFound(feature.to_string()));
        }

        let manifest: SeriesManifest =
            serde_json::from_slice(&fs::read(&manifest_path)?)?;
        let blob = fs::read(dir.join("frames.bin"))?;

        let (rows, cols) = manifest.metadata.shape;
        let mut frames = Vec::with_capacity(manifest.frames.len());
        for entry in &manifest.frames {
            let start = entry.offset as usize;
            let end = start + entry.len as usize;
            let slice = blob.get(start..end).ok_or_else(|| {
                StoreError::Codec(format!(
                    "frame index {}..{} outside blob of {} bytes",
                    start,
                    end,
                    blob.len()
                ))
            })?;

            let data = decode_frame(slice, rows * cols)?;
            frames.push(GridFrame::new(
                manifest.metadata.feature.clone(),
                entry.time,
                rows,
                cols,
                data,
            )?);
        }

        Ok(GridSeries::new(manifest.metadata, frames)?)
    }

    fn list_features(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut features = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() && entry.path().join("metadata.json").exists() {
                if let Some(name) = entry.file_name().to_str() {
                    features.push(name.to_string());
                }
            }
        }
        features.sort();
        Ok(features)
    }
}
