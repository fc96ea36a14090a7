//! Shared types for the windatlas workspace.
//!
//! Value types (points, variables, storage layouts, interpolation
//! methods), the supported time-frame handling, and the engine
//! configuration used by every other crate.

pub mod config;
pub mod time;
pub mod types;

pub use config::AtlasConfig;
pub use time::{TimeFrame, TimeFrameError};
pub use types::{GeoPoint, GridStorage, InterpolationMethod, ProjectedPoint, WindVariable};
