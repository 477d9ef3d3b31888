//! Virtual trackball: maps screen positions onto a unit hemisphere.

use glam::{Vec2, Vec3};

/// Screen area the controls listen on, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Horizontal offset of the area within the window.
    pub offset_left: f32,
    /// Vertical offset of the area within the window.
    pub offset_top: f32,
}

impl Viewport {
    /// Creates a viewport anchored at the window origin.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            offset_left: 0.0,
            offset_top: 0.0,
        }
    }

    /// Reference radius of the virtual ball.
    #[must_use]
    pub fn radius(&self) -> f32 {
        (self.width + self.height) / 4.0
    }

    /// Width / height, or 1 for an empty viewport.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Screen position scaled by the ball radius, used for zoom and pan deltas.
    #[must_use]
    pub fn mouse_on_screen(&self, x: f32, y: f32) -> Vec2 {
        let radius = self.radius();
        if radius <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            (x - self.offset_left) / radius * 0.5,
            (y - self.offset_top) / radius * 0.5,
        )
    }

    /// Position on the unit ball in screen axes (x right, y up, z toward viewer).
    ///
    /// Points outside the ball are pulled onto its rim.
    #[must_use]
    pub fn ball_point(&self, x: f32, y: f32) -> Vec3 {
        let radius = self.radius();
        if radius <= 0.0 {
            return Vec3::ZERO;
        }
        let mut on_ball = Vec3::new(
            (x - self.width * 0.5 - self.offset_left) / radius,
            (self.height * 0.5 + self.offset_top - y) / radius,
            0.0,
        );
        let length = on_ball.length();
        if length > 1.0 {
            on_ball /= length;
        } else {
            on_ball.z = (1.0 - length * length).sqrt();
        }
        on_ball
    }

    /// Trackball point expressed in camera axes.
    ///
    /// `eye` is the target→camera vector and `up` the camera up vector. The
    /// ball's y goes along `up`, x along `up × eye` and z along `eye`.
    #[must_use]
    pub fn project_on_ball(&self, x: f32, y: f32, eye: Vec3, up: Vec3) -> Vec3 {
        let on_ball = self.ball_point(x, y);
        with_length(up, on_ball.y) + with_length(up.cross(eye), on_ball.x) + with_length(eye, on_ball.z)
    }

    /// Normalized device coordinates (`[-1, 1]`, y up) of a screen position.
    #[must_use]
    pub fn ndc(&self, x: f32, y: f32) -> Vec2 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Vec2::ZERO;
        }
        Vec2::new(
            (x - self.offset_left) / self.width * 2.0 - 1.0,
            -(y - self.offset_top) / self.height * 2.0 + 1.0,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}

/// Rescales `v` to `length`; a negative length flips it, a zero vector stays zero.
#[must_use]
pub fn with_length(v: Vec3, length: f32) -> Vec3 {
    v.normalize_or_zero() * length
}
