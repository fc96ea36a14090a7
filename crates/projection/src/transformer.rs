//! Engine-dispatching transformer.
//!
//! The native spherical LCC implementation is canonical; the proj4rs
//! engine exists as a cross-check and for deployments that want to
//! drive the transform from the PROJ string the atlas ships with.

use atlas_common::{GeoPoint, ProjectedPoint};
use thiserror::Error;

use crate::lambert::LambertConformal;

/// PROJ definition of the atlas coordinate system.
pub const ATLAS_PROJ_STRING: &str =
    "+proj=lcc +lat_1=48.0 +lat_2=54.0 +lat_0=50.893 +lon_0=10.736 +a=6370000 +b=6370000 +no_defs";

/// Errors raised while setting up or running a projection engine.
///
/// These are configuration errors, not input errors: a failure means
/// one of the CRS definitions could not be resolved.
#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("failed to resolve CRS definition '{definition}': {message}")]
    CrsDefinition { definition: String, message: String },

    #[error("projection transform failed: {0}")]
    TransformFailed(String),
}

/// Projection engine selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Engine {
    #[default]
    Native,
    Proj4,
}

impl std::str::FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "native" => Ok(Self::Native),
            "proj4" | "proj" => Ok(Self::Proj4),
            other => Err(format!("unknown projection engine: {other}")),
        }
    }
}

/// Transforms WGS84 coordinates into the atlas grid plane.
pub struct Transformer {
    inner: Inner,
}

enum Inner {
    Native(LambertConformal),
    Proj4 {
        geo: proj4rs::Proj,
        atlas: proj4rs::Proj,
    },
}

impl Transformer {
    /// Build a transformer for the atlas projection.
    pub fn new(engine: Engine) -> Result<Self, ProjectionError> {
        let inner = match engine {
            Engine::Native => Inner::Native(LambertConformal::atlas()),
            Engine::Proj4 => {
                let geo = proj4rs::Proj::from_user_string("+proj=longlat +datum=WGS84 +no_defs")
                    .map_err(|e| ProjectionError::CrsDefinition {
                        definition: "WGS84".to_string(),
                        message: e.to_string(),
                    })?;
                let atlas = proj4rs::Proj::from_user_string(ATLAS_PROJ_STRING).map_err(|e| {
                    ProjectionError::CrsDefinition {
                        definition: ATLAS_PROJ_STRING.to_string(),
                        message: e.to_string(),
                    }
                })?;
                Inner::Proj4 { geo, atlas }
            }
        };
        Ok(Self { inner })
    }

    /// Project a geographic point into the atlas plane (meters).
    ///
    /// Pure and deterministic: the same input always yields the same
    /// projected point.
    pub fn transform(&self, geo: GeoPoint) -> Result<ProjectedPoint, ProjectionError> {
        match &self.inner {
            Inner::Native(lcc) => Ok(lcc.project(geo)),
            Inner::Proj4 { geo: src, atlas } => {
                // proj4rs expects geographic coordinates in radians,
                // ordered (lon, lat).
                let mut point = (geo.lon.to_radians(), geo.lat.to_radians());
                proj4rs::transform::transform(src, atlas, &mut point)
                    .map_err(|e| ProjectionError::TransformFailed(e.to_string()))?;
                Ok(ProjectedPoint::new(point.0, point.1))
            }
        }
    }

    /// Inverse-project an atlas-plane point back to WGS84 degrees.
    pub fn inverse(&self, point: ProjectedPoint) -> Result<GeoPoint, ProjectionError> {
        match &self.inner {
            Inner::Native(lcc) => Ok(lcc.inverse(point)),
            Inner::Proj4 { geo: dst, atlas } => {
                let mut p = (point.x, point.y);
                proj4rs::transform::transform(atlas, dst, &mut p)
                    .map_err(|e| ProjectionError::TransformFailed(e.to_string()))?;
                Ok(GeoPoint::new(p.1.to_degrees(), p.0.to_degrees()))
            }
        }
    }
}
