//! Cosmetic celestial motion: the secondary body orbit and the sun.

use std::f32::consts::PI;

use chrono::{Timelike, Utc};
use glam::{Quat, Vec3};
use orbis_core::{SceneOptions, SecondaryBodyOptions};

/// A body on a tilted circular orbit around the globe.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitingBody {
    distance: f32,
    radius: f32,
    inclination: f32,
    angle: f32,
    angular_speed: f32,
    real_angular_speed: f32,
}

impl OrbitingBody {
    /// Places the body on the -Z side of its orbit.
    pub fn new(options: &SecondaryBodyOptions) -> Self {
        Self {
            distance: options.distance,
            radius: options.radius,
            inclination: options.inclination_degrees.to_radians(),
            angle: 0.0,
            angular_speed: options.angular_speed,
            real_angular_speed: options.real_angular_speed,
        }
    }

    /// World position of the body center.
    pub fn position(&self) -> Vec3 {
        Quat::from_rotation_x(self.inclination)
            * Quat::from_rotation_y(self.angle)
            * Vec3::new(0.0, 0.0, -self.distance)
    }

    /// Body radius.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Current orbit angle in radians.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Orbit advance per frame.
    pub fn angular_speed(&self, real_speeds: bool) -> f32 {
        if real_speeds {
            self.real_angular_speed
        } else {
            self.angular_speed
        }
    }

    /// Moves the body one frame along its orbit.
    pub fn advance(&mut self, real_speeds: bool) {
        self.angle = (self.angle + self.angular_speed(real_speeds)) % (2.0 * PI);
    }
}

/// Sun direction, turning about +Y.
#[derive(Debug, Clone, PartialEq)]
pub struct Sun {
    angle: f32,
    angular_speed: f32,
    real_angular_speed: f32,
}

impl Sun {
    /// Places the sun for the given UTC time of day in hours.
    ///
    /// At noon UTC the sun stands over the Greenwich meridian, then drifts
    /// west by 15° per hour.
    pub fn new(options: &SceneOptions, utc_hours: f32) -> Self {
        Self {
            angle: PI / 2.0 - PI * (utc_hours - 12.0) / 12.0,
            angular_speed: options.sun_angular_speed,
            real_angular_speed: options.real_sun_angular_speed,
        }
    }

    /// Unit direction from the globe center toward the sun.
    pub fn direction(&self) -> Vec3 {
        Quat::from_rotation_y(self.angle) * Vec3::Z
    }

    /// Moves the sun one frame westward.
    pub fn advance(&mut self, real_speeds: bool) {
        let speed = if real_speeds {
            self.real_angular_speed
        } else {
            self.angular_speed
        };
        self.angle = (self.angle - speed) % (2.0 * PI);
    }
}

/// Current UTC time of day in hours.
pub fn utc_hours_now() -> f32 {
    Utc::now().num_seconds_from_midnight() as f32 / 3600.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_starts_behind_globe_tilted() {
        let body = OrbitingBody::new(&SecondaryBodyOptions::default());
        let p = body.position();
        assert!((p.length() - 8.0).abs() < 1e-4);
        assert!(p.z < 0.0);
        let tilt = (p.y / p.length()).asin().to_degrees();
        assert!((tilt - 5.145).abs() < 1e-3);
    }

    #[test]
    fn test_body_advance_keeps_distance() {
        let options = SecondaryBodyOptions::default();
        let mut body = OrbitingBody::new(&options);
        for _ in 0..1000 {
            body.advance(false);
        }
        assert!((body.angle() - 1000.0 * options.angular_speed).abs() < 1e-3);
        assert!((body.position().length() - 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_sun_follows_time_of_day() {
        let options = SceneOptions::default();
        let noon = Sun::new(&options, 12.0).direction();
        assert!((noon - orbis_core::project(0.0, 0.0, 1.0)).length() < 1e-5);

        let evening = Sun::new(&options, 18.0).direction();
        assert!((evening - orbis_core::project(0.0, -90.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_utc_hours_in_day() {
        let h = utc_hours_now();
        assert!((0.0..24.0).contains(&h));
    }
}
