//! Spatial grid model: the canonical lat/lon mesh all sources project onto.
//!
//! The grid is configured once per pipeline run (angular resolution plus a
//! geographic domain) and is stateless afterwards: cell indexing and cell
//! centers are pure functions of the configuration. Dense per-timestamp
//! snapshots are [`GridFrame`]s; an ordered sequence of frames for one
//! feature is a [`GridSeries`].
//!
//! Missing data is represented explicitly: every cell of a frame holds
//! either a finite value or the `f32::NAN` sentinel, never an implicit gap.

pub mod error;
pub mod frame;
pub mod grid;
pub mod metadata;
pub mod series;

pub use error::{GridError, Result};
pub use frame::GridFrame;
pub use grid::CanonicalGrid;
pub use metadata::GridMetadata;
pub use series::GridSeries;
