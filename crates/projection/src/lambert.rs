//! Lambert Conformal Conic projection on a sphere.
//!
//! The projection parameters are fixed by the wind atlas delivery:
//! - Standard parallels: 48.0°N and 54.0°N
//! - Origin: 50.893°N, 10.736°E
//! - Spherical earth radius: 6 370 000 m
//!
//! Coordinates are meters from the projection origin, matching the
//! x/y axes of the atlas grids.

use std::f64::consts::PI;

use atlas_common::{GeoPoint, ProjectedPoint};

/// Lambert Conformal Conic projection parameters.
///
/// The derived constants (cone constant `n`, `F`, `rho0`) are
/// computed once at construction; forward and inverse transforms are
/// pure functions of them.
#[derive(Debug, Clone)]
pub struct LambertConformal {
    /// Central meridian in radians
    lon0: f64,
    /// Earth radius (meters)
    radius: f64,
    /// Cone constant (n)
    n: f64,
    /// F constant
    f: f64,
    /// Rho at the projection origin
    rho0: f64,
}

impl LambertConformal {
    /// Create a projection from parameters in degrees.
    pub fn new(lat1_deg: f64, lat2_deg: f64, lat0_deg: f64, lon0_deg: f64, radius: f64) -> Self {
        let to_rad = PI / 180.0;

        let lat1 = lat1_deg * to_rad;
        let lat2 = lat2_deg * to_rad;
        let lat0 = lat0_deg * to_rad;
        let lon0 = lon0_deg * to_rad;

        // Cone constant n
        let n = if (lat1 - lat2).abs() < 1e-10 {
            // Tangent cone (single standard parallel)
            lat1.sin()
        } else {
            // Secant cone (two standard parallels)
            let ln_ratio = (lat1.cos() / lat2.cos()).ln();
            let tan_ratio = ((PI / 4.0 + lat2 / 2.0).tan() / (PI / 4.0 + lat1 / 2.0).tan()).ln();
            ln_ratio / tan_ratio
        };

        // F constant
        let f = (lat1.cos() * (PI / 4.0 + lat1 / 2.0).tan().powf(n)) / n;

        // Rho at the origin latitude
        let rho0 = radius * f / (PI / 4.0 + lat0 / 2.0).tan().powf(n);

        Self {
            lon0,
            radius,
            n,
            f,
            rho0,
        }
    }

    /// The wind atlas projection.
    pub fn atlas() -> Self {
        Self::new(48.0, 54.0, 50.893, 10.736, 6_370_000.0)
    }

    /// Project a geographic point to planar coordinates (meters).
    pub fn project(&self, geo: GeoPoint) -> ProjectedPoint {
        let to_rad = PI / 180.0;
        let lat = geo.lat * to_rad;
        let lon = geo.lon * to_rad;

        // Normalize longitude difference to [-π, π]
        let mut dlon = lon - self.lon0;
        while dlon > PI {
            dlon -= 2.0 * PI;
        }
        while dlon < -PI {
            dlon += 2.0 * PI;
        }

        let rho = self.radius * self.f / (PI / 4.0 + lat / 2.0).tan().powf(self.n);
        let theta = self.n * dlon;

        ProjectedPoint {
            x: rho * theta.sin(),
            y: self.rho0 - rho * theta.cos(),
        }
    }

    /// Inverse-project planar coordinates back to WGS84 degrees.
    pub fn inverse(&self, point: ProjectedPoint) -> GeoPoint {
        let to_deg = 180.0 / PI;

        let dy = self.rho0 - point.y;
        let rho = (point.x * point.x + dy * dy).sqrt();
        let rho = if self.n < 0.0 { -rho } else { rho };

        let theta = point.x.atan2(dy);

        let lat = 2.0 * ((self.radius * self.f / rho).powf(1.0 / self.n)).atan() - PI / 2.0;
        let lon = self.lon0 + theta / self.n;

        GeoPoint {
            lat: lat * to_deg,
            lon: lon * to_deg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_zero() {
        let proj = LambertConformal::atlas();
        let p = proj.project(GeoPoint::new(50.893, 10.736));
        assert!(p.x.abs() < 1e-6, "x should be ~0, got {}", p.x);
        assert!(p.y.abs() < 1e-6, "y should be ~0, got {}", p.y);
    }

    #[test]
    fn test_roundtrip() {
        let proj = LambertConformal::atlas();

        for (lat, lon) in [(52.52, 13.405), (48.137, 11.575), (53.551, 9.993)] {
            let geo = GeoPoint::new(lat, lon);
            let planar = proj.project(geo);
            let back = proj.inverse(planar);

            assert!(
                (back.lat - lat).abs() < 1e-6,
                "lat roundtrip failed: {} vs {}",
                lat,
                back.lat
            );
            assert!(
                (back.lon - lon).abs() < 1e-6,
                "lon roundtrip failed: {} vs {}",
                lon,
                back.lon
            );
        }
    }

    #[test]
    fn test_deterministic() {
        let proj = LambertConformal::atlas();
        let geo = GeoPoint::new(51.0, 12.0);
        assert_eq!(proj.project(geo), proj.project(geo));
    }

    #[test]
    fn test_north_of_origin_is_positive_y() {
        let proj = LambertConformal::atlas();
        let north = proj.project(GeoPoint::new(53.0, 10.736));
        let south = proj.project(GeoPoint::new(49.0, 10.736));
        assert!(north.y > 0.0);
        assert!(south.y < 0.0);
    }
}
