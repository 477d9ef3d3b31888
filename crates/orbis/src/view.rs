//! The globe view: owns every controller and runs the per-frame tick.

use std::fmt;
use std::time::Duration;

use glam::{Vec2, Vec3};
use orbis_core::{OrbisError, Options, Result, SceneUniforms, SelectionEvent};
use orbis_render::{
    AnimationHandle, Camera, CameraAnimator, InputEvent, Key, TrackballControls, Viewport,
};
use winit::event::WindowEvent;

use crate::input::{InputAdapter, ViewEvent};
use crate::navigation::{initial_position, Navigator};
use crate::pickable::{Marker, SurfacePart};
use crate::scene::{utc_hours_now, OrbitingBody, Sun};
use crate::selector::{ClickContext, ClickOutcome, PickingSelector, SelectionState};

/// Receives the scene once per frame.
pub trait RenderTarget {
    /// Draws one frame.
    fn render(&mut self, frame: &FrameState<'_>);
}

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameState<'a> {
    /// Shader parameters derived this frame.
    pub uniforms: &'a SceneUniforms,
    /// The camera after controls and animations ran.
    pub camera: &'a Camera,
    /// Markers with their current colors.
    pub markers: &'a [Marker],
    /// Surface parts with their current opacities.
    pub surfaces: &'a [SurfacePart],
    /// Center of the secondary body.
    pub body_position: Option<Vec3>,
    /// Unit direction toward the sun.
    pub sun_direction: Vec3,
    /// Frames rendered before this one.
    pub frame_index: u64,
}

/// Collaborator callback receiving every selection change.
pub type SelectionCallback = Box<dyn FnMut(SelectionEvent)>;

/// An interactive globe.
///
/// Construct it with the pickables and a selection callback, feed it input,
/// and call [`frame`](Self::frame) once per display refresh.
pub struct GlobeView {
    options: Options,
    controls: TrackballControls,
    animator: CameraAnimator,
    selector: PickingSelector,
    navigator: Navigator,
    body: Option<OrbitingBody>,
    sun: Sun,
    uniforms: SceneUniforms,
    input: InputAdapter,
    on_selected: SelectionCallback,
    frame_index: u64,
    destroyed: bool,
}

impl fmt::Debug for GlobeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlobeView")
            .field("camera", self.controls.camera())
            .field("selection", self.selector.state())
            .field("auto_rotate", &self.navigator.is_auto_rotating())
            .field("frame_index", &self.frame_index)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl GlobeView {
    /// Builds a view.
    ///
    /// When `options.scene.center_on` names a country, the camera starts
    /// facing it and the country starts selected, without a callback.
    pub fn new(
        options: Options,
        viewport: Viewport,
        markers: Vec<Marker>,
        surfaces: Vec<SurfacePart>,
        on_selected: impl FnMut(SelectionEvent) + 'static,
    ) -> Result<Self> {
        options.validate()?;
        let mut selector = PickingSelector::new(markers, surfaces, &options.scene)?;

        let center = options
            .scene
            .center_on
            .as_deref()
            .and_then(|id| selector.country_center(id));
        let start = initial_position(center, options.camera.initial_distance);

        let mut camera = Camera::from_options(&options.camera, viewport.aspect_ratio());
        camera.position = start;
        let controls = TrackballControls::new(camera, viewport, &options.controls)?;

        if let Some(id) = options.scene.center_on.as_deref() {
            selector.select_country(id);
        }

        let animator = CameraAnimator::new(Duration::from_millis(options.scene.animation_duration_ms));
        let navigator = Navigator::new(&options.scene, start);
        let body = options.scene.secondary_body.as_ref().map(OrbitingBody::new);
        let sun = Sun::new(&options.scene, utc_hours_now());

        log::debug!(
            "globe view ready: {} markers, {} surface parts, camera at {start:?}",
            selector.markers().len(),
            selector.surfaces().len()
        );

        let mut view = Self {
            options,
            controls,
            animator,
            selector,
            navigator,
            body,
            sun,
            uniforms: SceneUniforms::default(),
            input: InputAdapter::new(),
            on_selected: Box::new(on_selected),
            frame_index: 0,
            destroyed: false,
        };
        view.refresh_uniforms();
        Ok(view)
    }

    fn ensure_alive(&self) -> Result<()> {
        if self.destroyed {
            Err(OrbisError::Destroyed)
        } else {
            Ok(())
        }
    }

    /// Runs one frame: celestial motion, auto-rotation, controls, tweens,
    /// shader parameters, then rendering.
    pub fn frame(&mut self, dt: Duration, target: &mut dyn RenderTarget) -> Result<()> {
        self.ensure_alive()?;
        let real_speeds = self.options.scene.real_speeds;

        if let Some(body) = &mut self.body {
            body.advance(real_speeds);
        }
        self.sun.advance(real_speeds);

        let body_speed = self.body.as_ref().map(|b| b.angular_speed(real_speeds));
        self.navigator.tick(&mut self.controls, body_speed);
        self.controls.update(dt);
        self.animator.update(dt, self.controls.camera_mut());
        self.refresh_uniforms();

        target.render(&FrameState {
            uniforms: &self.uniforms,
            camera: self.controls.camera(),
            markers: self.selector.markers(),
            surfaces: self.selector.surfaces(),
            body_position: self.body.as_ref().map(OrbitingBody::position),
            sun_direction: self.sun.direction(),
            frame_index: self.frame_index,
        });
        self.frame_index += 1;
        Ok(())
    }

    fn refresh_uniforms(&mut self) {
        let camera = self.controls.camera();
        self.uniforms = SceneUniforms::new(
            camera.view_projection_matrix(),
            camera.position,
            self.sun.direction(),
        );
    }

    /// Feeds a platform-neutral input event. Returns true if it was used.
    ///
    /// Releasing a left/right navigation key swings the camera.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        if self.destroyed {
            return false;
        }
        match event {
            InputEvent::KeyUp(Key::Left) => {
                self.navigator.move_left(&self.controls, &mut self.animator);
                true
            }
            InputEvent::KeyUp(Key::Right) => {
                self.navigator.move_right(&self.controls, &mut self.animator);
                true
            }
            _ => self.controls.handle_event(event),
        }
    }

    /// Feeds a winit window event. Returns true if it was used.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        if self.destroyed {
            return false;
        }
        let mut used = false;
        for translated in self.input.translate(event) {
            match translated {
                ViewEvent::Input(input) => used |= self.handle_input(&input),
                ViewEvent::Click(position) => {
                    used |= self.click(position).is_ok();
                }
            }
        }
        used
    }

    /// Resolves a click at a window position in pixels.
    pub fn click(&mut self, position: Vec2) -> Result<ClickOutcome> {
        let ndc = self.controls.viewport().ndc(position.x, position.y);
        self.click_ndc(ndc)
    }

    /// Resolves a click at normalized device coordinates.
    pub fn click_ndc(&mut self, ndc: Vec2) -> Result<ClickOutcome> {
        self.ensure_alive()?;
        let mut cx = ClickContext {
            selector: &mut self.selector,
            controls: &mut self.controls,
            animator: &mut self.animator,
            navigator: &mut self.navigator,
            body: self.body.as_ref(),
            on_selected: &mut *self.on_selected,
        };
        let outcome = PickingSelector::click(&mut cx, ndc);
        debug_assert!(self.selector.selection_is_consistent());
        Ok(outcome)
    }

    /// Selects a country programmatically, without moving the camera or
    /// calling back.
    pub fn select_country(&mut self, identifier: &str) -> Result<bool> {
        self.ensure_alive()?;
        Ok(self.selector.select_country(identifier))
    }

    /// Clears the selection without calling back.
    pub fn unselect(&mut self) -> Result<()> {
        self.ensure_alive()?;
        self.selector.unselect();
        Ok(())
    }

    /// Swings the camera left about the globe axis.
    pub fn move_left(&mut self) -> Result<AnimationHandle> {
        self.ensure_alive()?;
        Ok(self.navigator.move_left(&self.controls, &mut self.animator))
    }

    /// Swings the camera right about the globe axis.
    pub fn move_right(&mut self) -> Result<AnimationHandle> {
        self.ensure_alive()?;
        Ok(self.navigator.move_right(&self.controls, &mut self.animator))
    }

    /// Stops auto-rotation and flies back to the starting position.
    pub fn reset_to_initial(&mut self) -> Result<AnimationHandle> {
        self.ensure_alive()?;
        Ok(self.navigator.reset_to_initial(&self.controls, &mut self.animator))
    }

    /// Flips auto-rotation. Returns the new state.
    pub fn toggle_auto_rotate(&mut self) -> Result<bool> {
        self.ensure_alive()?;
        Ok(self.navigator.toggle_auto_rotate(&self.controls, &mut self.animator))
    }

    /// Flies to the secondary body and follows it. `None` if the scene has none.
    pub fn move_to_secondary_body(&mut self) -> Result<Option<AnimationHandle>> {
        self.ensure_alive()?;
        let Some(body) = &self.body else {
            return Ok(None);
        };
        Ok(Some(self.navigator.move_to_body(
            body.position(),
            &self.controls,
            &mut self.animator,
        )))
    }

    /// Sets the closest allowed orbit distance.
    pub fn set_min_distance(&mut self, distance: f32) {
        self.controls.set_min_distance(distance);
    }

    /// Sets the farthest allowed orbit distance.
    pub fn set_max_distance(&mut self, distance: f32) {
        self.controls.set_max_distance(distance);
    }

    /// Detaches input and cancels every tween. The view is unusable afterwards.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        log::debug!("destroying globe view after {} frames", self.frame_index);
        self.animator.cancel_all();
        self.controls.set_enabled(false);
        self.destroyed = true;
    }

    /// True once [`destroy`](Self::destroy) ran.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// The camera.
    pub fn camera(&self) -> &Camera {
        self.controls.camera()
    }

    /// The trackball controls.
    pub fn controls(&self) -> &TrackballControls {
        &self.controls
    }

    /// The camera animator.
    pub fn animator(&self) -> &CameraAnimator {
        &self.animator
    }

    /// The selector with its pickables.
    pub fn selector(&self) -> &PickingSelector {
        &self.selector
    }

    /// The current selection.
    pub fn selection(&self) -> &SelectionState {
        self.selector.state()
    }

    /// Auto-rotation and navigation state.
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Shader parameters of the last frame.
    pub fn uniforms(&self) -> &SceneUniforms {
        &self.uniforms
    }

    /// Options the view was built with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Center of the secondary body.
    pub fn secondary_body_position(&self) -> Option<Vec3> {
        self.body.as_ref().map(OrbitingBody::position)
    }

    /// Unit direction toward the sun.
    pub fn sun_direction(&self) -> Vec3 {
        self.sun.direction()
    }

    /// Frames rendered so far.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}
