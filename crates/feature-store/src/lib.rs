//! Storage contracts for the climate feature grid pipeline.
//!
//! Replaces ambient on-disk state with explicit interfaces handed to the
//! core:
//!
//! - [`RawRecordStore`]: opaque per-source payloads keyed by
//!   source/category/time-range, for the acquisition collaborator.
//! - [`ObservationSource`]: normalized station records produced by the
//!   processing collaborator and consumed by the interpolation engine.
//! - [`FeatureStore`]: dense derived series plus grid metadata, read by
//!   the media rendering collaborator.
//!
//! Filesystem implementations are provided for each; series frames are
//! persisted as deflate-compressed `f32` chunks with a JSON manifest.

pub mod codec;
pub mod error;
pub mod raw;
pub mod records;
pub mod store;

pub use error::{Result, StoreError};
pub use raw::{FsRawRecordStore, RawRecordStore};
pub use records::{FsObservationSource, ObservationSource};
pub use store::{FeatureStore, FsFeatureStore};
