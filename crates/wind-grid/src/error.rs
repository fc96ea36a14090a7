//! Error types for grid access and point extraction.

use std::path::PathBuf;

use atlas_common::{TimeFrameError, WindVariable};
use thiserror::Error;

/// Errors that can occur while loading or interpolating wind grids.
#[derive(Error, Debug)]
pub enum GridError {
    /// A backing grid file does not exist.
    #[error("grid file not found: {0}")]
    MissingFile(PathBuf),

    /// Failed to open a grid file.
    #[error("failed to open grid {path}: {message}")]
    OpenFailed { path: PathBuf, message: String },

    /// Failed to read a variable from an opened grid.
    #[error("failed to read '{variable}' data: {message}")]
    ReadFailed { variable: String, message: String },

    /// The grid file is missing a required dimension or coordinate.
    #[error("invalid grid metadata: {0}")]
    InvalidMetadata(String),

    /// The remap table does not match the grid's axis lengths.
    #[error("remap table {axis} axis has {found} values, grid expects {expected}")]
    RemapMismatch {
        axis: &'static str,
        expected: usize,
        found: usize,
    },

    /// Interpolation produced NaN, meaning the point lies outside
    /// the grid's coverage for the chosen method. Treated as a fatal
    /// data-quality error rather than passed through.
    #[error("interpolation of '{variable}' at ({x}, {y}) produced NaN (outside grid coverage?)")]
    ExtrapolatedNan {
        variable: WindVariable,
        x: f64,
        y: f64,
    },

    /// A time-series layout was opened without a time frame.
    #[error("storage layout '{0}' requires a time frame")]
    MissingTimeFrame(String),

    /// Time-frame parsing or window validation failed.
    #[error(transparent)]
    TimeFrame(#[from] TimeFrameError),

    /// One year of a parallel extraction failed; the whole operation
    /// is aborted and no partial results are returned.
    #[error("extraction of year {year} failed: {source}")]
    YearFailed {
        year: i32,
        #[source]
        source: Box<GridError>,
    },

    /// The extraction deadline elapsed before all years completed.
    #[error("extraction deadline of {0:.1?} exceeded")]
    DeadlineExceeded(std::time::Duration),

    /// The extraction was cancelled by the caller.
    #[error("extraction cancelled")]
    Cancelled,

    /// Remap CSV parsing error.
    #[error("remap table error: {0}")]
    Remap(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, GridError>;
