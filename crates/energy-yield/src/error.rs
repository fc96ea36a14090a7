//! Error types for distribution and AEP math.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum YieldError {
    /// A distribution or availability parameter is outside its
    /// domain; computing with it would silently produce NaN/Inf.
    #[error("invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// Probability and power arrays differ in length.
    #[error("probability and power arrays differ in length: {probabilities} vs {powers}")]
    LengthMismatch { probabilities: usize, powers: usize },

    /// AEP integration over zero bins is undefined.
    #[error("AEP integration needs at least one windspeed bin")]
    EmptyBins,

    /// Power lookup against the curve table failed.
    #[error(transparent)]
    PowerCurve(#[from] power_curve::PowerCurveError),
}

pub type Result<T> = std::result::Result<T, YieldError>;
