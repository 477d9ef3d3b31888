//! orbis: an interactive 3D globe controller.
//!
//! orbis drives the camera and the country selection of a globe on which
//! per-country markers and country-shaped surfaces can be clicked. Drawing is
//! left to a [`RenderTarget`] supplied by the caller.
//!
//! # Quick Start
//!
//! ```no_run
//! use orbis::*;
//! use std::time::Duration;
//!
//! struct Screen;
//!
//! impl RenderTarget for Screen {
//!     fn render(&mut self, frame: &FrameState<'_>) {
//!         // upload frame.uniforms.as_bytes(), draw markers and surfaces
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     init_logging();
//!
//!     let france = CountryInfo::new("FRA", "France").with_center(GeoCoord::new(46.0, 2.0));
//!     let markers = vec![Marker::new(france, GLOBE_RADIUS)?];
//!
//!     let mut view = GlobeView::new(
//!         Options::default(),
//!         Viewport::new(1280.0, 720.0),
//!         markers,
//!         Vec::new(),
//!         |event| println!("selection: {:?}", event.info().identifier),
//!     )?;
//!
//!     view.click(Vec2::new(640.0, 360.0))?;
//!     view.frame(Duration::from_millis(16), &mut Screen)?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`TrackballControls`] owns the camera and integrates pointer, touch and
//!   wheel input once per frame, with inertia and distance bounds
//! - [`PickingSelector`] resolves clicks against [`Marker`]s and
//!   [`SurfacePart`]s and keeps the [`SelectionState`]
//! - [`CameraAnimator`] tweens the camera toward selections and navigation
//!   targets
//! - [`GlobeView`] ties them together and runs the per-frame tick

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Accessors return plain values
#![allow(clippy::must_use_candidate)]
// Screen coordinates and counts convert to f32 on purpose
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::float_cmp)]

pub mod input;
pub mod navigation;
pub mod pickable;
pub mod scene;
pub mod selector;
pub mod view;

// Re-export core types
pub use orbis_core::{
    options::{hex_color, GLOBE_RADIUS},
    project, unproject, ControlsOptions, CameraOptions, CountryInfo, GeoCoord, OrbisError,
    Options, Pickable, Ray, Result, SceneOptions, SceneUniforms, SecondaryBodyOptions,
    SelectionEvent, Mat4, Quat, Vec2, Vec3, Vec4,
};

// Re-export camera types
pub use orbis_render::{
    AnimationHandle, Camera, CameraAnimator, CameraField, InputEvent, InteractionMode, Key,
    Modifiers, PointerButton, TrackballControls, Viewport,
};

pub use input::{InputAdapter, ViewEvent};
pub use navigation::Navigator;
pub use pickable::{Marker, SurfacePart};
pub use scene::{OrbitingBody, Sun};
pub use selector::{
    ClickCallback, ClickContext, ClickOutcome, PickTarget, PickingSelector, SelectionPhase,
    SelectionState,
};
pub use view::{FrameState, GlobeView, RenderTarget, SelectionCallback};

/// Installs `env_logger` as the `log` backend.
///
/// Filtering follows `RUST_LOG`. Calling it again, or after another logger
/// was installed, does nothing.
pub fn init_logging() {
    let _ = env_logger::try_init();
}
