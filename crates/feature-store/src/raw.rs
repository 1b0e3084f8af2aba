//! Raw payload store for the acquisition collaborator.
//!
//! Persists downloaded payloads as opaque bytes keyed by source,
//! category and time range, so re-runs can skip the network entirely.
//! The pipeline core never looks inside these payloads.

use std::fs;
use std::path::{Path, PathBuf};

use climate_common::SourceId;
use tracing::debug;

use crate::error::Result;

/// Read/write contract for raw downloaded payloads.
pub trait RawRecordStore {
    /// Persist a payload, overwriting any previous one under the same
    /// key.
    fn put(&self, source: &SourceId, category: &str, time_range: &str, payload: &[u8])
        -> Result<()>;

    /// Fetch a payload, `None` if the key has never been stored.
    fn get(&self, source: &SourceId, category: &str, time_range: &str)
        -> Result<Option<Vec<u8>>>;

    /// Whether a payload exists for the key.
    fn contains(&self, source: &SourceId, category: &str, time_range: &str) -> Result<bool>;
}

/// Directory-backed raw payload store: one file per key under
/// `root/<source>/<category>/<time_range>.bin`.
#[derive(Debug, Clone)]
pub struct FsRawRecordStore {
    root: PathBuf,
}

impl FsRawRecordStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn key_path(&self, source: &SourceId, category: &str, time_range: &str) -> PathBuf {
        self.root
            .join(sanitize(source.as_str()))
            .join(sanitize(category))
            .join(format!("{}.bin", sanitize(time_range)))
    }
}

impl RawRecordStore for FsRawRecordStore {
    fn put(
        &self,
        source: &SourceId,
        category: &str,
        time_range: &str,
        payload: &[u8],
    ) -> Result<()> {
        let path = self.key_path(source, category, time_range);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, payload)?;
        debug!(path = %path.display(), bytes = payload.len(), "stored raw payload");
        Ok(())
    }

    fn get(
        &self,
        source: &SourceId,
        category: &str,
        time_range: &str,
    ) -> Result<Option<Vec<u8>>> {
        let path = self.key_path(source, category, time_range);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read(&path)?))
    }

    fn contains(&self, source: &SourceId, category: &str, time_range: &str) -> Result<bool> {
        Ok(self.key_path(source, category, time_range).exists())
    }
}

/// Replace path-hostile characters so keys map onto single path
/// components.
fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Convenience for tests and tooling: path of the store root.
impl AsRef<Path> for FsRawRecordStore {
    fn as_ref(&self) -> &Path {
        &self.root
    }
}
