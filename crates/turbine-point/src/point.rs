//! The turbine point and its per-point computation outcome.

use atlas_common::{GeoPoint, InterpolationMethod};
use serde::{Deserialize, Serialize};
use wind_grid::ValueSeries;

use crate::error::PointError;

/// One turbine site to evaluate. Immutable input; results live in
/// the batch's [`crate::ResultTable`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurbinePoint {
    /// Identity of the point, the column key in the result table.
    pub id: String,
    pub geo: GeoPoint,
    /// Hub height in meters; snapped to the nearest grid level.
    pub hub_height: f64,
    /// Key into the batch's power-curve registry.
    pub turbine_type: String,
    /// Spatial interpolation for the x/y grid axes.
    pub interpolation: InterpolationMethod,
}

/// Computation stages a point passes through. A failure is tagged
/// with the stage it happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Created,
    CoordinateResolved,
    WindExtracted,
    PowerComputed,
    Done,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Created => "created",
            Self::CoordinateResolved => "coordinate-resolved",
            Self::WindExtracted => "wind-extracted",
            Self::PowerComputed => "power-computed",
            Self::Done => "done",
        };
        write!(f, "{name}")
    }
}

/// Successful result of one point.
#[derive(Debug, Clone, PartialEq)]
pub enum PointResult {
    PowerTimeSeries(ValueSeries),
    Aep(f64),
}

/// Outcome of one point within a batch; failures never abort the
/// batch.
#[derive(Debug)]
pub enum PointOutcome {
    Completed(PointResult),
    Failed { stage: Stage, error: PointError },
}

impl PointOutcome {
    pub fn result(&self) -> Option<&PointResult> {
        match self {
            Self::Completed(result) => Some(result),
            Self::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}
