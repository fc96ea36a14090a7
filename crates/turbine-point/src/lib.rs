//! Batch orchestration of turbine-point yield computations.
//!
//! A [`PointCollection`] drives every [`TurbinePoint`] through the
//! same stages: resolve the coordinate, extract wind variables,
//! compute power or AEP. Grid sources and power-curve tables are
//! loaded once per batch and shared read-only across points; one
//! point's failure is recorded and never aborts the batch.

pub mod collection;
pub mod error;
pub mod method;
pub mod point;
pub mod result;

pub use collection::PointCollection;
pub use error::{PointError, Result};
pub use method::CalculationMethod;
pub use point::{PointOutcome, PointResult, Stage, TurbinePoint};
pub use result::ResultTable;
