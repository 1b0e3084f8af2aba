//! Per-cell elementwise combination of aligned grid series.

use grid_model::{GridFrame, GridSeries};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{FeatureError, Result};

/// Elementwise operation applied per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineOp {
    /// `a - b` (e.g. surface minus aloft).
    Difference,
    /// `a + b`.
    Sum,
    /// `(a + b) / 2`.
    Mean,
}

impl CombineOp {
    fn apply(&self, a: f32, b: f32) -> f32 {
        match self {
            Self::Difference => a - b,
            Self::Sum => a + b,
            Self::Mean => (a + b) / 2.0,
        }
    }
}

impl std::fmt::Display for CombineOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Difference => write!(f, "difference"),
            Self::Sum => write!(f, "sum"),
            Self::Mean => write!(f, "mean"),
        }
    }
}

/// Combine two series into a derived series, per cell and per timestamp.
///
/// Both inputs must share the canonical grid; the output is defined on
/// the timestamp intersection of the inputs. A cell missing in either
/// input is missing in the output: no-data absorbs, it never becomes an
/// implicit zero.
pub fn combine(
    op: CombineOp,
    feature: impl Into<String>,
    a: &GridSeries,
    b: &GridSeries,
) -> Result<GridSeries> {
    if !a.metadata().same_grid(b.metadata()) {
        return Err(FeatureError::GridMismatch {
            left: describe(a),
            right: describe(b),
        });
    }

    let feature = feature.into();
    let (rows, cols) = a.metadata().shape;

    let mut frames = Vec::new();
    for frame_a in a.frames() {
        let Some(frame_b) = b.frame_at(frame_a.time()) else {
            continue;
        };

        let data = frame_a
            .data()
            .iter()
            .zip(frame_b.data())
            .map(|(&x, &y)| {
                if x.is_nan() || y.is_nan() {
                    f32::NAN
                } else {
                    op.apply(x, y)
                }
            })
            .collect();

        frames.push(GridFrame::new(
            feature.clone(),
            frame_a.time(),
            rows,
            cols,
            data,
        )?);
    }

    let mut metadata = a.metadata().clone();
    metadata.feature = feature.clone();

    info!(
        feature = %feature,
        op = %op,
        frames = frames.len(),
        a = %a.metadata().feature,
        b = %b.metadata().feature,
        "combined series"
    );

    GridSeries::new(metadata, frames).map_err(FeatureError::from)
}

fn describe(series: &GridSeries) -> String {
    let m = series.metadata();
    format!(
        "{} ({}x{} @ {} deg)",
        m.feature, m.shape.0, m.shape.1, m.resolution
    )
}
