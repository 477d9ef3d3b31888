//! Camera navigation commands and auto-rotation.

use glam::{Quat, Vec3};
use orbis_core::SceneOptions;
use orbis_render::{AnimationHandle, CameraAnimator, CameraField, TrackballControls};

/// How far past the secondary body the camera stops.
const BODY_DISTANCE_FACTOR: f32 = 1.1;

/// Returns the camera start position: facing `center` (if any) at `distance`.
pub fn initial_position(center: Option<Vec3>, distance: f32) -> Vec3 {
    center
        .map(Vec3::normalize_or_zero)
        .filter(|dir| *dir != Vec3::ZERO)
        .unwrap_or(Vec3::Z)
        * distance
}

/// Rotates `position` about +Y by `angle`, leftward for positive angles.
pub fn swing_left(position: Vec3, angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(
        position.x * cos - position.z * sin,
        position.y,
        position.z * cos + position.x * sin,
    )
}

/// Auto-rotation state and the initial-position bookmark.
#[derive(Debug, Clone)]
pub struct Navigator {
    initial_position: Vec3,
    move_angle: f32,
    auto_rotate_speed: f32,
    globe_radius: f32,
    auto_rotate: bool,
    locked_on_body: bool,
}

impl Navigator {
    /// Creates a navigator. The camera is expected at `initial_position`.
    pub fn new(options: &SceneOptions, initial_position: Vec3) -> Self {
        Self {
            initial_position,
            move_angle: options.move_angle(),
            auto_rotate_speed: options.auto_rotate_speed,
            globe_radius: options.globe_radius,
            auto_rotate: false,
            locked_on_body: false,
        }
    }

    /// Position restored by [`reset_to_initial`](Self::reset_to_initial).
    pub fn initial_position(&self) -> Vec3 {
        self.initial_position
    }

    /// Whether the camera spins around the globe each frame.
    pub fn is_auto_rotating(&self) -> bool {
        self.auto_rotate
    }

    /// Whether auto-rotation follows the secondary body.
    pub fn is_locked_on_body(&self) -> bool {
        self.locked_on_body
    }

    /// Starts auto-rotation and straightens the camera up vector.
    pub fn enable_auto_rotate(&mut self, controls: &TrackballControls, animator: &mut CameraAnimator) {
        log::debug!("auto-rotate on");
        self.auto_rotate = true;
        let camera = controls.camera();
        animator.animate(CameraField::Up, camera.up, Vec3::Y, animator.duration());
    }

    /// Stops auto-rotation; the camera freezes where it is.
    pub fn disable_auto_rotate(&mut self) {
        if self.auto_rotate {
            log::debug!("auto-rotate off");
        }
        self.auto_rotate = false;
    }

    /// Flips auto-rotation. Returns the new state.
    pub fn toggle_auto_rotate(
        &mut self,
        controls: &TrackballControls,
        animator: &mut CameraAnimator,
    ) -> bool {
        if self.auto_rotate {
            self.disable_auto_rotate();
        } else {
            self.enable_auto_rotate(controls, animator);
        }
        self.auto_rotate
    }

    /// Releases the lock on the secondary body.
    pub fn release_body_lock(&mut self) {
        self.locked_on_body = false;
    }

    /// Swings the camera left about the globe axis.
    pub fn move_left(
        &self,
        controls: &TrackballControls,
        animator: &mut CameraAnimator,
    ) -> AnimationHandle {
        let camera = controls.camera();
        animator.animate_position(camera, swing_left(camera.position, self.move_angle))
    }

    /// Swings the camera right about the globe axis.
    pub fn move_right(
        &self,
        controls: &TrackballControls,
        animator: &mut CameraAnimator,
    ) -> AnimationHandle {
        let camera = controls.camera();
        animator.animate_position(camera, swing_left(camera.position, -self.move_angle))
    }

    /// Stops auto-rotation and flies back to the initial position.
    pub fn reset_to_initial(
        &mut self,
        controls: &TrackballControls,
        animator: &mut CameraAnimator,
    ) -> AnimationHandle {
        self.disable_auto_rotate();
        animator.animate_position(controls.camera(), self.initial_position)
    }

    /// Flies just past the secondary body and follows it.
    pub fn move_to_body(
        &mut self,
        body_position: Vec3,
        controls: &TrackballControls,
        animator: &mut CameraAnimator,
    ) -> AnimationHandle {
        self.enable_auto_rotate(controls, animator);
        self.locked_on_body = true;
        let mut to = body_position * BODY_DISTANCE_FACTOR;
        // Keep the globe in view below the body
        to.y -= self.globe_radius;
        animator.animate_position(controls.camera(), to)
    }

    /// Spins the camera about +Y when auto-rotation is on.
    ///
    /// `body_speed` replaces the regular speed while locked on the body.
    pub fn tick(&mut self, controls: &mut TrackballControls, body_speed: Option<f32>) {
        if !self.auto_rotate {
            return;
        }
        let speed = match body_speed {
            Some(speed) if self.locked_on_body => speed,
            _ => self.auto_rotate_speed,
        };
        let camera = controls.camera_mut();
        camera.position = Quat::from_rotation_y(speed) * camera.position;
        camera.look_at(camera.target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbis_core::ControlsOptions;
    use orbis_render::{Camera, Viewport};
    use std::f32::consts::FRAC_PI_2;
    use std::time::Duration;

    fn setup() -> (Navigator, TrackballControls, CameraAnimator) {
        let options = SceneOptions::default();
        let controls = TrackballControls::new(
            Camera::new(1.0),
            Viewport::new(800.0, 800.0),
            &ControlsOptions::default(),
        )
        .unwrap();
        let navigator = Navigator::new(&options, controls.camera().position);
        (navigator, controls, CameraAnimator::default())
    }

    fn finish(controls: &mut TrackballControls, animator: &mut CameraAnimator) {
        while animator.is_animating() {
            animator.update(Duration::from_millis(16), controls.camera_mut());
        }
    }

    #[test]
    fn test_swing_left_quarter_turn() {
        let p = swing_left(Vec3::new(0.0, 0.3, 1.0), FRAC_PI_2);
        assert!((p - Vec3::new(-1.0, 0.3, 0.0)).length() < 1e-6);
        let back = swing_left(p, -FRAC_PI_2);
        assert!((back - Vec3::new(0.0, 0.3, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_initial_position_defaults_to_z() {
        assert_eq!(initial_position(None, 1.66), Vec3::new(0.0, 0.0, 1.66));
        assert_eq!(initial_position(Some(Vec3::ZERO), 2.0), Vec3::new(0.0, 0.0, 2.0));
        let p = initial_position(Some(orbis_core::project(0.0, 0.0, 0.5)), 2.0);
        assert!((p - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_move_left_then_right_returns() {
        let (nav, mut controls, mut animator) = setup();
        let start = controls.camera().position;
        nav.move_left(&controls, &mut animator);
        finish(&mut controls, &mut animator);
        assert!((controls.camera().position.length() - start.length()).abs() < 1e-5);
        assert!(controls.camera().position.x < 0.0);

        nav.move_right(&controls, &mut animator);
        finish(&mut controls, &mut animator);
        assert!((controls.camera().position - start).length() < 1e-5);
    }

    #[test]
    fn test_toggle_auto_rotate_spins_camera() {
        let (mut nav, mut controls, mut animator) = setup();
        assert!(nav.toggle_auto_rotate(&controls, &mut animator));
        let before = controls.camera().position;
        nav.tick(&mut controls, None);
        let after = controls.camera().position;
        assert!((after - before).length() > 0.0);
        assert!((after.length() - before.length()).abs() < 1e-6);
        assert!(!nav.toggle_auto_rotate(&controls, &mut animator));
        nav.tick(&mut controls, None);
        assert_eq!(controls.camera().position, after);
    }

    #[test]
    fn test_reset_stops_auto_rotate() {
        let (mut nav, mut controls, mut animator) = setup();
        nav.enable_auto_rotate(&controls, &mut animator);
        for _ in 0..50 {
            nav.tick(&mut controls, None);
        }
        let handle = nav.reset_to_initial(&controls, &mut animator);
        assert!(!nav.is_auto_rotating());
        finish(&mut controls, &mut animator);
        assert!(!animator.is_active(handle));
        assert_eq!(controls.camera().position, nav.initial_position());
    }

    #[test]
    fn test_move_to_body_locks() {
        let (mut nav, mut controls, mut animator) = setup();
        nav.move_to_body(Vec3::new(0.0, 0.0, -8.0), &controls, &mut animator);
        assert!(nav.is_auto_rotating() && nav.is_locked_on_body());
        finish(&mut controls, &mut animator);
        assert!((controls.camera().position - Vec3::new(0.0, -0.5, -8.8)).length() < 1e-4);
    }
}
