//! Camera layer for orbis.
//!
//! This crate provides everything that moves the camera:
//! - [`Camera`], a perspective camera with picking rays
//! - [`TrackballControls`], the inertial trackball manipulator
//! - [`CameraAnimator`], eased position and up-vector tweens

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Controls carry the no_rotate/no_zoom/no_pan flags
#![allow(clippy::struct_excessive_bools)]
// Millisecond durations and counters fit comfortably in f32
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]

pub mod animation;
pub mod camera;
pub mod controls;
pub mod trackball;

pub use animation::{ease_quadratic_in_out, orbit_lerp, AnimationHandle, CameraAnimator, CameraField};
pub use camera::Camera;
pub use controls::{
    InputEvent, InteractionMode, Key, Modifiers, PointerButton, TrackballControls, WHEEL_NOTCH,
};
pub use trackball::{with_length, Viewport};
