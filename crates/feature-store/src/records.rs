//! Processed observation records from the normalizer collaborator.

use std::fs;
use std::path::PathBuf;

use climate_common::StationRecord;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{Result, StoreError};

/// Read contract for normalized station records.
///
/// The upstream contract: records are already deduplicated,
/// coordinate-normalized and unit-normalized per source. Per-record
/// validation still happens downstream, where a bad record can be
/// excluded without failing the batch.
pub trait ObservationSource {
    /// Load every available record.
    fn load(&self) -> Result<Vec<StationRecord>>;
}

/// Directory of JSON documents, each holding an array of
/// [`StationRecord`]s.
#[derive(Debug, Clone)]
pub struct FsObservationSource {
    root: PathBuf,
}

impl FsObservationSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ObservationSource for FsObservationSource {
    fn load(&self) -> Result<Vec<StationRecord>> {
        let mut records = Vec::new();
        let mut files = 0usize;

        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| StoreError::BadRecordFile {
                path: self.root.display().to_string(),
                reason: e.to_string(),
            })?;
            if !entry.file_type().is_file()
                || entry.path().extension().map_or(true, |ext| ext != "json")
            {
                continue;
            }

            let bytes = fs::read(entry.path())?;
            let mut batch: Vec<StationRecord> =
                serde_json::from_slice(&bytes).map_err(|e| StoreError::BadRecordFile {
                    path: entry.path().display().to_string(),
                    reason: e.to_string(),
                })?;

            debug!(path = %entry.path().display(), records = batch.len(), "loaded record file");
            files += 1;
            records.append(&mut batch);
        }

        info!(files, records = records.len(), "loaded station records");
        Ok(records)
    }
}
