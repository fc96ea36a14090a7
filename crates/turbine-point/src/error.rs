//! Batch-computation error types.

use atlas_common::TimeFrameError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PointError {
    /// Coordinate projection failed (configuration error).
    #[error(transparent)]
    Projection(#[from] projection::ProjectionError),

    /// Grid loading or interpolation failed.
    #[error(transparent)]
    Grid(#[from] wind_grid::GridError),

    /// Power-curve lookup failed.
    #[error(transparent)]
    PowerCurve(#[from] power_curve::PowerCurveError),

    /// Distribution or AEP math failed.
    #[error(transparent)]
    Yield(#[from] energy_yield::YieldError),

    /// Requested time frame is missing or outside the validity
    /// window; rejected before any grid I/O.
    #[error(transparent)]
    TimeFrame(#[from] TimeFrameError),

    /// The calculation method needs a time frame but none was given.
    #[error("calculation method '{0}' requires a time frame")]
    MissingTimeFrame(crate::method::CalculationMethod),

    /// No power curve registered for a point's turbine type.
    #[error("no power curve registered for turbine type '{0}'")]
    MissingPowerCurve(String),

    /// An extraction returned the wrong shape for the method (a
    /// scalar where a series was needed, or vice versa).
    #[error("variable '{variable}' returned a {got} where a {expected} was expected")]
    ShapeMismatch {
        variable: atlas_common::WindVariable,
        expected: &'static str,
        got: &'static str,
    },

    /// Windspeed and air-density series disagree on sample count.
    #[error("windspeed and air-density series differ in length: {windspeeds} vs {densities}")]
    SeriesMismatch { windspeeds: usize, densities: usize },

    /// Bad engine configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Result table CSV export failed.
    #[error("result export failed: {0}")]
    Export(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PointError>;
