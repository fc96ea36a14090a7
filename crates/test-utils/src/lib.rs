//! Shared test utilities for the windatlas workspace.
//!
//! Provides synthetic NetCDF grid fixtures and power-curve CSV
//! fixtures so that crate tests never depend on real atlas data.
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;
