//! Configuration options for orbis.
//!
//! All values are plain numbers injected at construction. Options can be
//! built in code or read from JSON; missing fields take their defaults.

use std::f32::consts::PI;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{OrbisError, Result};

/// Radius of the globe in world units.
pub const GLOBE_RADIUS: f32 = 0.5;

/// Global configuration options.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Trackball manipulation settings.
    pub controls: ControlsOptions,

    /// Perspective camera settings.
    pub camera: CameraOptions,

    /// Scene layout, animation and highlight settings.
    pub scene: SceneOptions,
}

impl Options {
    /// Parses options from a JSON document and validates them.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Reads options from a JSON file and validates them.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        log::debug!("loading options from {}", path.as_ref().display());
        Self::from_json_str(&json)
    }

    /// Serializes options to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks value ranges and cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        self.controls.validate()?;
        self.camera.validate()?;
        self.scene.validate()
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> OrbisError {
    OrbisError::InvalidOption {
        name,
        reason: reason.into(),
    }
}

/// Settings of the trackball camera manipulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsOptions {
    /// Rotation gain applied to the trackball angle each tick.
    pub rotate_speed: f32,

    /// Zoom gain applied to the vertical zoom delta each tick.
    pub zoom_speed: f32,

    /// Pan gain, scaled by the current orbit distance.
    pub pan_speed: f32,

    /// Inertia decay. Close to 0 drifts for a long time, 1 stops immediately.
    pub damping_factor: f32,

    /// Closest allowed distance between camera and target.
    pub min_distance: f32,

    /// Farthest allowed distance between camera and target.
    pub max_distance: f32,

    /// Pointer travel (pixels) after which a press counts as a drag.
    pub drag_threshold: f32,

    /// Delay after release before a drag stops suppressing clicks.
    pub has_moved_debounce_ms: u64,

    /// Disables rotation.
    pub no_rotate: bool,

    /// Disables zoom.
    pub no_zoom: bool,

    /// Disables panning.
    pub no_pan: bool,
}

impl Default for ControlsOptions {
    fn default() -> Self {
        Self {
            rotate_speed: 0.15,
            zoom_speed: 1.33,
            pan_speed: 0.3,
            damping_factor: 0.33,
            // Keep the camera out of the globe
            min_distance: GLOBE_RADIUS + 0.2,
            max_distance: 100.0,
            drag_threshold: 0.0,
            has_moved_debounce_ms: 10,
            no_rotate: false,
            no_zoom: false,
            no_pan: false,
        }
    }
}

impl ControlsOptions {
    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.min_distance < 0.0 {
            return Err(invalid("controls.min_distance", "must be non-negative"));
        }
        if self.min_distance > self.max_distance {
            return Err(OrbisError::InvalidDistanceBounds {
                min: self.min_distance,
                max: self.max_distance,
            });
        }
        if !(self.damping_factor > 0.0 && self.damping_factor <= 1.0) {
            return Err(invalid(
                "controls.damping_factor",
                format!("{} is outside (0, 1]", self.damping_factor),
            ));
        }
        for (name, value) in [
            ("controls.rotate_speed", self.rotate_speed),
            ("controls.zoom_speed", self.zoom_speed),
            ("controls.pan_speed", self.pan_speed),
            ("controls.drag_threshold", self.drag_threshold),
        ] {
            if value < 0.0 || !value.is_finite() {
                return Err(invalid(name, format!("{value} must be a finite non-negative number")));
            }
        }
        Ok(())
    }
}

/// Perspective camera settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,

    /// Near clipping plane.
    pub near: f32,

    /// Far clipping plane.
    pub far: f32,

    /// Distance from the globe center at startup.
    pub initial_distance: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fov_degrees: 50.0,
            near: 0.1,
            far: 25_000.0,
            initial_distance: 1.66,
        }
    }
}

impl CameraOptions {
    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.fov_degrees > 0.0 && self.fov_degrees < 180.0) {
            return Err(invalid("camera.fov_degrees", "must be within (0, 180)"));
        }
        if !(self.near > 0.0 && self.far > self.near) {
            return Err(invalid("camera.near", "expected 0 < near < far"));
        }
        if self.initial_distance <= 0.0 {
            return Err(invalid("camera.initial_distance", "must be positive"));
        }
        Ok(())
    }
}

/// A body orbiting the globe that can be clicked to fly the camera to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecondaryBodyOptions {
    /// Distance from the globe center.
    pub distance: f32,

    /// Body radius.
    pub radius: f32,

    /// Orbit tilt against the equatorial plane, in degrees.
    pub inclination_degrees: f32,

    /// Orbit advance per frame in radians.
    pub angular_speed: f32,

    /// Orbit advance per frame in radians when real speeds are requested.
    pub real_angular_speed: f32,
}

impl Default for SecondaryBodyOptions {
    fn default() -> Self {
        Self {
            distance: 8.0,
            radius: 0.25,
            inclination_degrees: 5.145,
            angular_speed: (2.0 * PI) / (27.3 * 60.0 * 60.0) * 12.0,
            real_angular_speed: (2.0 * PI) / (27.3 * 24.0 * 60.0 * 60.0),
        }
    }
}

/// Scene layout, animation and highlight settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneOptions {
    /// Globe radius. Markers are anchored on this sphere.
    pub globe_radius: f32,

    /// Picking reach used when testing the globe and the secondary body.
    pub scene_radius: f32,

    /// Duration of every camera tween.
    pub animation_duration_ms: u64,

    /// Angle swept by the left/right navigation commands, in degrees.
    pub move_angle_degrees: f32,

    /// Camera auto-rotation per frame in radians.
    pub auto_rotate_speed: f32,

    /// Sun advance per frame in radians.
    pub sun_angular_speed: f32,

    /// Sun advance per frame in radians when real speeds are requested.
    pub real_sun_angular_speed: f32,

    /// Use real angular speeds for the sun and the secondary body.
    pub real_speeds: bool,

    /// Idle marker color.
    pub marker_color: Vec3,

    /// Selected marker color.
    pub marker_selected_color: Vec3,

    /// Surface opacity while selected (0 when idle).
    pub surface_selected_opacity: f32,

    /// Country to select and face at startup.
    pub center_on: Option<String>,

    /// Optional orbiting body.
    pub secondary_body: Option<SecondaryBodyOptions>,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            globe_radius: GLOBE_RADIUS,
            scene_radius: 220.0,
            animation_duration_ms: 366,
            move_angle_degrees: 30.0,
            auto_rotate_speed: (2.0 * PI) / (60.0 * 120.0),
            sun_angular_speed: (2.0 * PI) / (365.25 * 24.0 * 60.0 * 60.0) * 12.0,
            real_sun_angular_speed: (2.0 * PI) / (365.25 * 24.0 * 60.0 * 60.0),
            real_speeds: false,
            marker_color: hex_color(0x0056_d45b),
            marker_selected_color: hex_color(0x00e3_1c17),
            surface_selected_opacity: 0.4,
            center_on: None,
            secondary_body: Some(SecondaryBodyOptions::default()),
        }
    }
}

impl SceneOptions {
    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.globe_radius <= 0.0 {
            return Err(invalid("scene.globe_radius", "must be positive"));
        }
        if self.scene_radius < self.globe_radius {
            return Err(invalid("scene.scene_radius", "must enclose the globe"));
        }
        if !(0.0..=1.0).contains(&self.surface_selected_opacity) {
            return Err(invalid("scene.surface_selected_opacity", "must be within [0, 1]"));
        }
        if let Some(body) = &self.secondary_body {
            if body.radius <= 0.0 || body.distance <= self.globe_radius + body.radius {
                return Err(invalid(
                    "scene.secondary_body",
                    "must have a positive radius and orbit outside the globe",
                ));
            }
        }
        Ok(())
    }

    /// Angle swept by the left/right commands, in radians.
    pub fn move_angle(&self) -> f32 {
        self.move_angle_degrees.to_radians()
    }
}

/// Converts a `0xRRGGBB` value into a linear `[0, 1]` color.
pub fn hex_color(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Vec3::new(r, g, b)
}
