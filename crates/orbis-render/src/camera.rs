//! Perspective camera looking at the globe.

use glam::{Mat4, Vec2, Vec3};
use orbis_core::{CameraOptions, Ray};

/// A 3D perspective camera.
///
/// The orientation is fully described by `position`, `target` and `up`;
/// [`Camera::look_at`] only retargets, the matrices are derived on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Up vector.
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Camera {
    /// Creates a camera on the +Z axis looking at the origin.
    #[must_use]
    pub fn new(aspect_ratio: f32) -> Self {
        Self::from_options(&CameraOptions::default(), aspect_ratio)
    }

    /// Creates a camera from options, placed at `initial_distance` on +Z.
    #[must_use]
    pub fn from_options(options: &CameraOptions, aspect_ratio: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, options.initial_distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: options.fov_degrees.to_radians(),
            aspect_ratio,
            near: options.near,
            far: options.far,
        }
    }

    /// Sets the aspect ratio. Degenerate viewports are ignored.
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
            self.aspect_ratio = aspect_ratio;
        }
    }

    /// Points the camera at `target`.
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Returns the view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Returns the projection matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect_ratio, self.near, self.far)
    }

    /// Returns the combined view-projection matrix.
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Returns the camera's forward direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Returns the distance between camera and target.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Builds the picking ray through normalized device coordinates.
    ///
    /// Returns `None` when the camera matrices are degenerate.
    #[must_use]
    pub fn ray_through(&self, ndc: Vec2) -> Option<Ray> {
        let view_proj = self.view_projection_matrix();
        if view_proj.determinant().abs() < f32::EPSILON {
            return None;
        }
        let mut ray = Ray::from_ndc(ndc, view_proj.inverse())?;
        // Start at the eye rather than the near plane
        ray.origin = self.position;
        Some(ray)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_defaults() {
        let camera = Camera::default();
        assert!((camera.fov.to_degrees() - 50.0).abs() < 1e-4);
        assert_eq!(camera.target, Vec3::ZERO);
        assert!((camera.distance() - 1.66).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_aspect_ignored() {
        let mut camera = Camera::new(1.5);
        camera.set_aspect_ratio(0.0);
        camera.set_aspect_ratio(f32::NAN);
        assert_eq!(camera.aspect_ratio, 1.5);
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = Camera::new(1.0);
        let ray = camera.ray_through(Vec2::ZERO).unwrap();
        assert_eq!(ray.origin, camera.position);
        assert!((ray.dir - camera.forward()).length() < 1e-4);
    }

    #[test]
    fn test_offset_ray_leans_right() {
        let camera = Camera::new(1.0);
        let ray = camera.ray_through(Vec2::new(0.5, 0.0)).unwrap();
        let right = camera.forward().cross(camera.up);
        assert!(ray.dir.dot(right) > 0.0);
    }
}
