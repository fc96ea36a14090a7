//! Polymorphic access to the gridded wind-resource data.
//!
//! One `WindDataSource` is opened per (variable, storage layout)
//! pair and answers point-interpolation queries in the atlas's
//! planar coordinates. Time-series layouts return a full series per
//! query; static climatological layouts return a single scalar.
//!
//! Per-year storage is extracted in parallel: each year's sub-grid
//! is loaded fully into memory by one worker of a bounded pool and
//! the per-year series are concatenated in ascending year order
//! after all workers have finished.

pub mod error;
pub mod factory;
pub mod interp;
pub mod pool;
pub mod remap;
mod netcdf_io;
pub mod source;
pub mod static_mean;
pub mod time_series;
pub mod volume;

pub use error::{GridError, Result};
pub use factory::{grid_path, open_source};
pub use pool::{CancelToken, ExtractionLimits};
pub use source::{Extraction, ValueSeries, WindDataSource};
pub use static_mean::StaticMeanGrid;
pub use time_series::TimeSeriesGrid;
pub use volume::GridVolume;
