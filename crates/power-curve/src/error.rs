//! Power-curve error types.

use atlas_common::InterpolationMethod;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PowerCurveError {
    /// Raw curve CSV could not be read or parsed.
    #[error("power curve CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The CSV header does not hold numeric air densities.
    #[error("invalid power curve header cell '{0}': expected an air density")]
    InvalidHeader(String),

    /// A non-empty cell failed to parse as a number.
    #[error("invalid number '{value}' in power curve row {row}")]
    InvalidNumber { row: usize, value: String },

    /// Fewer rows survived parsing than interpolation needs.
    #[error("power curve has only {0} usable rows, need at least 2")]
    TooFewRows(usize),

    /// A builder increment is zero or negative.
    #[error("increment must be positive, got {0}")]
    InvalidIncrement(f64),

    /// `get_power` input arrays differ in length.
    #[error("windspeed and air-density arrays differ in length: {windspeeds} vs {densities}")]
    LengthMismatch { windspeeds: usize, densities: usize },

    /// A lookup value lies outside the table's axis extents. A miss
    /// is fatal rather than NaN.
    #[error("{axis} value {value} outside power curve table extents")]
    OutOfRange { axis: &'static str, value: f64 },

    /// Table lookups support nearest and linear only.
    #[error("power lookup does not support '{0}' interpolation")]
    UnsupportedLookup(InterpolationMethod),

    /// Single-density expansion got a curve with several densities.
    #[error("expected a single-density curve, got {0} density columns")]
    NotSingleDensity(usize),
}

pub type Result<T> = std::result::Result<T, PowerCurveError>;
