//! Core value types for point extraction.

use serde::{Deserialize, Serialize};

/// A geographic point in WGS84 degrees.
///
/// Immutable once constructed; the projected counterpart is derived
/// by the projection crate and owned by the turbine point that
/// created it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lon)
    }
}

/// A point in the wind atlas's planar Lambert Conformal Conic
/// coordinate system, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedPoint {
    pub x: f64,
    pub y: f64,
}

impl ProjectedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Physical variables available in the wind atlas grids.
///
/// Each variable maps to the data-variable code used inside the grid
/// files and in their file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindVariable {
    Windspeed,
    AirDensity,
    RelativeHumidity,
    WindDirection,
    AirPressure,
    WeibullA,
    WeibullK,
}

impl WindVariable {
    /// Data-variable code, also the file-name fragment.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Windspeed => "wspd",
            Self::AirDensity => "rho",
            Self::RelativeHumidity => "rhum",
            Self::WindDirection => "wdir",
            Self::AirPressure => "pres",
            Self::WeibullA => "wbA",
            Self::WeibullK => "wbk",
        }
    }

    /// Physical unit of the variable.
    pub fn units(&self) -> &'static str {
        match self {
            Self::Windspeed => "m/s",
            Self::AirDensity => "kg/m³",
            Self::RelativeHumidity => "%",
            Self::WindDirection => "°",
            Self::AirPressure => "hPa",
            Self::WeibullA => "m/s",
            Self::WeibullK => "",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "wspd" => Some(Self::Windspeed),
            "rho" => Some(Self::AirDensity),
            "rhum" => Some(Self::RelativeHumidity),
            "wdir" => Some(Self::WindDirection),
            "pres" => Some(Self::AirPressure),
            "wbA" => Some(Self::WeibullA),
            "wbk" => Some(Self::WeibullK),
            _ => None,
        }
    }
}

impl std::fmt::Display for WindVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Storage layouts of the wind atlas grids.
///
/// The layout determines the path template of the backing files and
/// whether a time axis is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GridStorage {
    /// One NetCDF time-series file per year.
    TimeSeriesPerYear,
    /// A single multi-year NetCDF time-series file.
    SingleFileMultiyear,
    /// Static high-resolution (3 arc seconds) climatological mean.
    HighResMean,
    /// Static coarse (3 km) multi-year mean statistics.
    CoarseMultiyearMean,
}

impl GridStorage {
    /// Folder fragment under the atlas base path.
    pub fn folder(&self) -> &'static str {
        match self {
            Self::TimeSeriesPerYear => "TSNC-Format",
            Self::SingleFileMultiyear => "NC-Format",
            Self::HighResMean => "3arcsecs",
            Self::CoarseMultiyearMean => "Statistics",
        }
    }

    /// Whether grids of this layout carry a time axis.
    pub fn has_time_axis(&self) -> bool {
        matches!(self, Self::TimeSeriesPerYear | Self::SingleFileMultiyear)
    }
}

impl std::str::FromStr for GridStorage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ts" | "tsnc" | "time-series-per-year" => Ok(Self::TimeSeriesPerYear),
            "nc" | "single-file-multiyear" => Ok(Self::SingleFileMultiyear),
            "90m" | "static-high-resolution-mean" => Ok(Self::HighResMean),
            "3km" | "static-coarse-multiyear-mean" => Ok(Self::CoarseMultiyearMean),
            other => Err(format!("unknown grid storage kind: {other}")),
        }
    }
}

/// Interpolation method for the spatial (x, y) axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InterpolationMethod {
    /// Nearest grid point (the only method defined outside the hull).
    Nearest,
    #[default]
    Linear,
    /// 3-point Lagrange stencil.
    Quadratic,
    /// 4-point Catmull-Rom stencil.
    Cubic,
}

impl std::str::FromStr for InterpolationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "linear" => Ok(Self::Linear),
            "quadratic" => Ok(Self::Quadratic),
            "cubic" => Ok(Self::Cubic),
            other => Err(format!("unknown interpolation method: {other}")),
        }
    }
}

impl std::fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nearest => write!(f, "nearest"),
            Self::Linear => write!(f, "linear"),
            Self::Quadratic => write!(f, "quadratic"),
            Self::Cubic => write!(f, "cubic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_codes_roundtrip() {
        for var in [
            WindVariable::Windspeed,
            WindVariable::AirDensity,
            WindVariable::RelativeHumidity,
            WindVariable::WindDirection,
            WindVariable::AirPressure,
            WindVariable::WeibullA,
            WindVariable::WeibullK,
        ] {
            assert_eq!(WindVariable::from_code(var.code()), Some(var));
        }
        assert_eq!(WindVariable::from_code("nope"), None);
    }

    #[test]
    fn test_storage_time_axis() {
        assert!(GridStorage::TimeSeriesPerYear.has_time_axis());
        assert!(GridStorage::SingleFileMultiyear.has_time_axis());
        assert!(!GridStorage::HighResMean.has_time_axis());
        assert!(!GridStorage::CoarseMultiyearMean.has_time_axis());
    }

    #[test]
    fn test_interpolation_method_parse() {
        assert_eq!(
            "cubic".parse::<InterpolationMethod>(),
            Ok(InterpolationMethod::Cubic)
        );
        assert!("bogus".parse::<InterpolationMethod>().is_err());
    }
}
