//! Coordinate transformation between WGS84 and the wind atlas grid.
//!
//! The atlas grids live in a Lambert Conformal Conic projection on a
//! sphere. Two interchangeable engines are provided: a native
//! implementation of the spherical LCC equations (canonical) and a
//! proj4rs-backed one driven by the atlas PROJ string. Both agree
//! within 1e-3 m.

mod lambert;
mod transformer;

pub use lambert::LambertConformal;
pub use transformer::{Engine, ProjectionError, Transformer, ATLAS_PROJ_STRING};
