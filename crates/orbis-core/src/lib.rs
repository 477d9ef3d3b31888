//! Core abstractions for orbis.
//!
//! This crate provides the renderer-independent building blocks:
//! - [`geo::project`] mapping latitude/longitude onto the globe sphere
//! - [`CountryInfo`] metadata and the [`SelectionEvent`] sent to collaborators
//! - [`Ray`] casting primitives and the [`Pickable`] trait
//! - [`Options`] configuration and the [`SceneUniforms`] shader block

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Options structs legitimately have many boolean flags
#![allow(clippy::struct_excessive_bools)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]
// Hex color channels are 8-bit and convert exactly
#![allow(clippy::cast_precision_loss)]

pub mod country;
pub mod error;
pub mod geo;
pub mod options;
pub mod pick;
pub mod uniforms;

pub use country::{CountryInfo, SelectionEvent};
pub use error::{OrbisError, Result};
pub use geo::{project, unproject, GeoCoord};
pub use options::{CameraOptions, ControlsOptions, Options, SceneOptions, SecondaryBodyOptions};
pub use pick::{pick_nearest, PickHit, Pickable, Ray};
pub use uniforms::SceneUniforms;

// Re-export glam types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
