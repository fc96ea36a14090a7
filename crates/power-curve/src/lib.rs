//! Turbine power-curve tables.
//!
//! A raw manufacturer curve (power over windspeed, one column per
//! air density) is regridded onto fine regular axes so that later
//! per-sample lookups become cheap table reads. The built table is
//! immutable and shared read-only across all points of one turbine
//! type.

pub mod error;
pub mod raw;
mod regrid;
pub mod table;

pub use error::{PowerCurveError, Result};
pub use raw::RawPowerCurve;
pub use table::{PowerCurveBuilder, PowerCurveTable, REFERENCE_DENSITY};
