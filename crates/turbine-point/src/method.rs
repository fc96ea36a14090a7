//! Calculation-method dispatch.

use atlas_common::{GridStorage, WindVariable};
use serde::{Deserialize, Serialize};

/// How a point's yield is computed.
///
/// The time-series method integrates a full power time series from
/// the 3 km hourly grids; the mean methods fit a Weibull or Rayleigh
/// distribution from the static climatological grids (90 m
/// high-resolution or 3 km statistics) and integrate the AEP
/// analytically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalculationMethod {
    TimeSeries3km,
    Mean90Weibull,
    Mean90Rayleigh,
    Mean3kmWeibull,
    Mean3kmRayleigh,
}

impl CalculationMethod {
    /// The (variable, storage) pairs the method extracts. Every
    /// method needs air density for the power-curve lookup.
    pub fn required_sources(&self) -> &'static [(WindVariable, GridStorage)] {
        match self {
            Self::TimeSeries3km => &[
                (WindVariable::Windspeed, GridStorage::TimeSeriesPerYear),
                (WindVariable::AirDensity, GridStorage::TimeSeriesPerYear),
            ],
            Self::Mean90Weibull => &[
                (WindVariable::WeibullA, GridStorage::HighResMean),
                (WindVariable::WeibullK, GridStorage::HighResMean),
                (WindVariable::AirDensity, GridStorage::CoarseMultiyearMean),
            ],
            Self::Mean90Rayleigh => &[
                (WindVariable::Windspeed, GridStorage::HighResMean),
                (WindVariable::AirDensity, GridStorage::CoarseMultiyearMean),
            ],
            Self::Mean3kmWeibull => &[
                (WindVariable::WeibullA, GridStorage::CoarseMultiyearMean),
                (WindVariable::WeibullK, GridStorage::CoarseMultiyearMean),
                (WindVariable::AirDensity, GridStorage::CoarseMultiyearMean),
            ],
            Self::Mean3kmRayleigh => &[
                (WindVariable::Windspeed, GridStorage::CoarseMultiyearMean),
                (WindVariable::AirDensity, GridStorage::CoarseMultiyearMean),
            ],
        }
    }

    /// Only the time-series method slices along a time axis.
    pub fn needs_time_frame(&self) -> bool {
        matches!(self, Self::TimeSeries3km)
    }
}

impl std::str::FromStr for CalculationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "time-series" | "ts-3km" => Ok(Self::TimeSeries3km),
            "weibull-90m" => Ok(Self::Mean90Weibull),
            "rayleigh-90m" => Ok(Self::Mean90Rayleigh),
            "weibull-3km" => Ok(Self::Mean3kmWeibull),
            "rayleigh-3km" => Ok(Self::Mean3kmRayleigh),
            other => Err(format!("unknown calculation method: {other}")),
        }
    }
}

impl std::fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::TimeSeries3km => "ts-3km",
            Self::Mean90Weibull => "weibull-90m",
            Self::Mean90Rayleigh => "rayleigh-90m",
            Self::Mean3kmWeibull => "weibull-3km",
            Self::Mean3kmRayleigh => "rayleigh-3km",
        };
        write!(f, "{name}")
    }
}
