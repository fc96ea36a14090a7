//! The polymorphic wind data source interface.

use atlas_common::{GridStorage, InterpolationMethod, WindVariable};
use chrono::{DateTime, Utc};

use crate::error::Result;

/// A time-indexed series of extracted values.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSeries {
    pub times: Vec<DateTime<Utc>>,
    pub values: Vec<f64>,
}

impl ValueSeries {
    pub fn new(times: Vec<DateTime<Utc>>, values: Vec<f64>) -> Self {
        debug_assert_eq!(times.len(), values.len());
        Self { times, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Append another series; the caller guarantees chronological
    /// ordering across the pieces.
    pub fn extend(&mut self, other: ValueSeries) {
        self.times.extend(other.times);
        self.values.extend(other.values);
    }
}

/// Result of a point interpolation: a full series for time-axis
/// storage, a single snapshot for static storage.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Series(ValueSeries),
    Scalar(f64),
}

impl Extraction {
    pub fn as_series(&self) -> Option<&ValueSeries> {
        match self {
            Self::Series(s) => Some(s),
            Self::Scalar(_) => None,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::Series(_) => None,
        }
    }
}

/// One loaded (possibly lazily-chunked) grid handle for one variable
/// and storage layout.
///
/// Implementations are read-only after construction and safe to
/// share by reference across points and threads.
pub trait WindDataSource: Send + Sync {
    fn variable(&self) -> WindVariable;

    fn storage(&self) -> GridStorage;

    /// Extract the variable at a planar point and hub-height level.
    ///
    /// The level axis snaps to the nearest grid level; x/y use the
    /// given method. NaN from extrapolation is a fatal error.
    fn interpolate_point(
        &self,
        x: f64,
        y: f64,
        level: f64,
        method: InterpolationMethod,
    ) -> Result<Extraction>;
}
