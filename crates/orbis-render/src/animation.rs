//! Timed, eased camera tweens.

use std::time::Duration;

use glam::{Quat, Vec3};

use crate::camera::Camera;

/// Quadratic ease-in/ease-out over `t ∈ [0, 1]`.
#[must_use]
pub fn ease_quadratic_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

/// Camera vector a tween writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraField {
    /// `Camera::position`.
    Position,
    /// `Camera::up`.
    Up,
}

/// Identifies one in-flight tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationHandle {
    id: u64,
    field: CameraField,
}

impl AnimationHandle {
    /// The camera field this tween drives.
    #[must_use]
    pub fn field(&self) -> CameraField {
        self.field
    }
}

#[derive(Debug, Clone)]
struct Tween {
    handle: AnimationHandle,
    from: Vec3,
    to: Vec3,
    elapsed: Duration,
    duration: Duration,
}

impl Tween {
    fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            1.0
        } else {
            (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        }
    }

    /// Eased value at the current progress. Positions orbit `target`.
    fn value(&self, target: Vec3) -> Vec3 {
        let t = self.progress();
        if t >= 1.0 {
            return self.to;
        }
        let s = ease_quadratic_in_out(t);
        match self.handle.field {
            CameraField::Position => target + orbit_lerp(self.from - target, self.to - target, s),
            CameraField::Up => orbit_lerp(self.from, self.to, s),
        }
    }
}

/// Interpolates between two offsets along the great circle through them,
/// lerping the length, so the path never dips toward the origin.
///
/// Zero-length offsets fall back to a straight line.
#[must_use]
pub fn orbit_lerp(from: Vec3, to: Vec3, s: f32) -> Vec3 {
    let (from_len, to_len) = (from.length(), to.length());
    if from_len <= f32::EPSILON || to_len <= f32::EPSILON {
        return from.lerp(to, s);
    }
    let (from_dir, to_dir) = (from / from_len, to / to_len);
    let arc = Quat::from_rotation_arc(from_dir, to_dir);
    let direction = Quat::IDENTITY.slerp(arc, s) * from_dir;
    direction * (from_len + (to_len - from_len) * s)
}

/// Drives position and up-vector tweens.
///
/// At most one tween per [`CameraField`] is in flight; a new request for a
/// field replaces the previous one.
#[derive(Debug, Clone)]
pub struct CameraAnimator {
    tweens: Vec<Tween>,
    next_id: u64,
    duration: Duration,
}

impl Default for CameraAnimator {
    fn default() -> Self {
        Self::new(Duration::from_millis(366))
    }
}

impl CameraAnimator {
    /// Creates an animator whose convenience requests last `duration`.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            tweens: Vec::new(),
            next_id: 0,
            duration,
        }
    }

    /// Default tween duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Starts a tween of `field` from `from` to `to`.
    pub fn animate(
        &mut self,
        field: CameraField,
        from: Vec3,
        to: Vec3,
        duration: Duration,
    ) -> AnimationHandle {
        let handle = AnimationHandle {
            id: self.next_id,
            field,
        };
        self.next_id += 1;

        if let Some(index) = self.tweens.iter().position(|t| t.handle.field == field) {
            let old = self.tweens.swap_remove(index);
            log::debug!("tween {} on {field:?} superseded by {}", old.handle.id, handle.id);
        }
        self.tweens.push(Tween {
            handle,
            from,
            to,
            elapsed: Duration::ZERO,
            duration,
        });
        handle
    }

    /// Moves the camera to `to` while straightening its up vector to +Y.
    pub fn animate_position(&mut self, camera: &Camera, to: Vec3) -> AnimationHandle {
        log::debug!("animate camera {:?} -> {to:?}", camera.position);
        self.animate(CameraField::Up, camera.up, Vec3::Y, self.duration);
        self.animate(CameraField::Position, camera.position, to, self.duration)
    }

    /// Advances every tween and writes the results into `camera`.
    ///
    /// Finished tweens write their exact end value, then retire.
    pub fn update(&mut self, dt: Duration, camera: &mut Camera) {
        if self.tweens.is_empty() {
            return;
        }
        let target = camera.target;
        for tween in &mut self.tweens {
            tween.elapsed += dt;
            let value = tween.value(target);
            match tween.handle.field {
                CameraField::Position => camera.position = value,
                CameraField::Up => camera.up = value,
            }
        }
        camera.look_at(camera.target);
        self.tweens.retain(|t| {
            let done = t.progress() >= 1.0;
            if done {
                log::trace!("tween {} on {:?} retired", t.handle.id, t.handle.field);
            }
            !done
        });
    }

    /// Drops every in-flight tween, leaving the camera where it is.
    pub fn cancel_all(&mut self) {
        if !self.tweens.is_empty() {
            log::debug!("cancelling {} camera tweens", self.tweens.len());
        }
        self.tweens.clear();
    }

    /// True while any tween is in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        !self.tweens.is_empty()
    }

    /// True while `handle` has neither finished nor been superseded.
    #[must_use]
    pub fn is_active(&self, handle: AnimationHandle) -> bool {
        self.tweens.iter().any(|t| t.handle == handle)
    }

    /// Handles of every in-flight tween.
    #[must_use]
    pub fn active_handles(&self) -> Vec<AnimationHandle> {
        self.tweens.iter().map(|t| t.handle).collect()
    }
}
