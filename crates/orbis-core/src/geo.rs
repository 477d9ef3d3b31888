//! Geographic to cartesian projection on the globe sphere.
//!
//! The globe is centered on the world origin with +Y through the north pole.
//! Longitude 0 (Greenwich) on the equator maps to +X, longitude 90°E to -Z.

use std::f32::consts::PI;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoCoord {
    /// Latitude in degrees, positive north. Expected in `[-90, 90]`.
    pub lat: f32,
    /// Longitude in degrees, positive east. Expected in `[-180, 180]`.
    #[serde(alias = "long")]
    pub lon: f32,
}

impl GeoCoord {
    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(lat: f32, lon: f32) -> Self {
        Self { lat, lon }
    }

    /// Projects this coordinate onto a sphere of the given radius.
    #[must_use]
    pub fn to_cartesian(self, radius: f32) -> Vec3 {
        project(self.lat, self.lon, radius)
    }
}

/// Maps `(lat, lon, radius)` to a point on the sphere.
///
/// Inputs are not range checked: out-of-range angles still produce a point at
/// distance `radius` from the origin, just not the one a map would show.
#[must_use]
pub fn project(lat: f32, lon: f32, radius: f32) -> Vec3 {
    let phi = (90.0 - lat) * (PI / 180.0);
    let theta = (lon + 180.0) * (PI / 180.0);
    Vec3::new(
        -radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// Inverse of [`project`]: recovers latitude/longitude from a point.
///
/// The radius is discarded. The origin maps to `(0, 0)`, and the poles report
/// longitude `-180` since any longitude is valid there.
#[must_use]
pub fn unproject(point: Vec3) -> GeoCoord {
    let radius = point.length();
    if radius <= f32::EPSILON {
        return GeoCoord::default();
    }
    let phi = (point.y / radius).clamp(-1.0, 1.0).acos();
    let theta = point.z.atan2(-point.x);

    let lat = 90.0 - phi.to_degrees();
    let mut lon = theta.to_degrees() - 180.0;
    if lon < -180.0 {
        lon += 360.0;
    }
    GeoCoord { lat, lon }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "expected {b:?}, got {a:?}");
    }

    #[test]
    fn test_equator_greenwich_is_pos_x() {
        assert_close(project(0.0, 0.0, 1.0), Vec3::X);
        assert_close(project(0.0, 0.0, 2.5), Vec3::new(2.5, 0.0, 0.0));
    }

    #[test]
    fn test_poles_ignore_longitude() {
        for lon in [-180.0, -90.0, 0.0, 45.0, 180.0] {
            assert_close(project(90.0, lon, 0.5), Vec3::new(0.0, 0.5, 0.0));
            assert_close(project(-90.0, lon, 0.5), Vec3::new(0.0, -0.5, 0.0));
        }
    }

    #[test]
    fn test_east_is_neg_z() {
        assert_close(project(0.0, 90.0, 1.0), Vec3::NEG_Z);
        assert_close(project(0.0, -90.0, 1.0), Vec3::Z);
    }

    #[test]
    fn test_geo_coord_deserializes_long_alias() {
        let coord: GeoCoord = serde_json::from_str(r#"{"lat": 46.2, "long": 2.2}"#).unwrap();
        assert_eq!(coord, GeoCoord::new(46.2, 2.2));
    }

    #[test]
    fn test_unproject_origin() {
        assert_eq!(unproject(Vec3::ZERO), GeoCoord::default());
    }

    proptest! {
        #[test]
        fn projected_length_equals_radius(
            lat in -90.0f32..=90.0,
            lon in -180.0f32..=180.0,
            radius in 0.01f32..100.0,
        ) {
            let p = project(lat, lon, radius);
            prop_assert!((p.length() - radius).abs() <= radius * 1e-5);
        }

        #[test]
        fn unproject_recovers_coordinates(
            lat in -85.0f32..=85.0,
            lon in -179.0f32..=179.0,
        ) {
            let coord = unproject(project(lat, lon, 3.0));
            prop_assert!((coord.lat - lat).abs() < 1e-2);
            prop_assert!((coord.lon - lon).abs() < 1e-2);
        }
    }
}
