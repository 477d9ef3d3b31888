//! Trackball camera manipulator.
//!
//! Input handlers only record samples; all camera motion is integrated in
//! [`TrackballControls::update`], which must run once per frame even when no
//! input arrives so that inertia keeps decaying.

use std::time::Duration;

use glam::{Quat, Vec2, Vec3};
use orbis_core::{ControlsOptions, OrbisError, Result};

use crate::camera::Camera;
use crate::trackball::{with_length, Viewport};

/// Wheel units per notch, matching the browser-normalized `wheelDelta / 40`.
pub const WHEEL_NOTCH: f32 = 3.0;

/// Zoom sample change per wheel unit.
const WHEEL_ZOOM_SCALE: f32 = 0.01;

/// Rotation angles below this are treated as settled.
const MIN_ROTATION_ANGLE: f32 = 1e-6;

/// Screen deltas below this snap the sample start onto its end.
const MIN_SCREEN_DELTA: f32 = 1e-7;

/// The active manipulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// No button or touch held.
    #[default]
    None,
    /// Mouse orbit.
    Rotate,
    /// Mouse zoom.
    Zoom,
    /// Mouse pan.
    Pan,
    /// One-finger orbit.
    TouchRotate,
    /// Two-finger pinch zoom.
    TouchZoom,
    /// Three-finger pan.
    TouchPan,
}

impl InteractionMode {
    /// Mode selected by a pointer press.
    #[must_use]
    pub fn from_button(button: PointerButton, modifiers: Modifiers) -> Self {
        match button {
            PointerButton::Primary if modifiers.shift => InteractionMode::Pan,
            PointerButton::Primary if modifiers.ctrl => InteractionMode::Zoom,
            PointerButton::Primary => InteractionMode::Rotate,
            PointerButton::Middle => InteractionMode::Zoom,
            PointerButton::Secondary => InteractionMode::Pan,
            PointerButton::Other => InteractionMode::None,
        }
    }

    /// Mode selected by the number of fingers on the surface.
    #[must_use]
    pub fn from_touch_count(count: usize) -> Self {
        match count {
            1 => InteractionMode::TouchRotate,
            2 => InteractionMode::TouchZoom,
            3 => InteractionMode::TouchPan,
            _ => InteractionMode::None,
        }
    }

    /// Returns true if the mode drives rotation samples.
    #[must_use]
    pub fn is_rotate(self) -> bool {
        matches!(self, InteractionMode::Rotate | InteractionMode::TouchRotate)
    }

    /// Returns true if the mode drives zoom samples.
    #[must_use]
    pub fn is_zoom(self) -> bool {
        matches!(self, InteractionMode::Zoom | InteractionMode::TouchZoom)
    }

    /// Returns true if the mode drives pan samples.
    #[must_use]
    pub fn is_pan(self) -> bool {
        matches!(self, InteractionMode::Pan | InteractionMode::TouchPan)
    }
}

/// Pointer buttons, numbered like DOM `MouseEvent.button`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Button 0, usually left.
    Primary,
    /// Button 1, usually the wheel.
    Middle,
    /// Button 2, usually right.
    Secondary,
    /// Any other button.
    Other,
}

/// Keyboard modifiers that change the meaning of a primary press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// Shift held: primary press pans.
    pub shift: bool,
    /// Control held: primary press zooms.
    pub ctrl: bool,
}

/// Keys understood by the controls and the navigation commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Arrow left or `Q`.
    Left,
    /// Arrow right or `D`.
    Right,
    /// `+` / `=`.
    ZoomIn,
    /// `-`.
    ZoomOut,
}

/// Platform-neutral input delivered by the rendering surface.
///
/// Positions are in pixels relative to the window.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A pointer button was pressed.
    PointerDown { button: PointerButton, position: Vec2 },
    /// The pointer moved.
    PointerMove { position: Vec2 },
    /// A pointer button was released.
    PointerUp { button: PointerButton, position: Vec2 },
    /// Wheel scrolled by `delta` browser-normalized units (positive zooms in).
    Wheel { delta: f32 },
    /// A finger touched; `touches` lists every active touch.
    TouchStart { touches: Vec<Vec2> },
    /// Fingers moved; `touches` lists every active touch.
    TouchMove { touches: Vec<Vec2> },
    /// A finger lifted; `touches` lists the remaining touches.
    TouchEnd { touches: Vec<Vec2> },
    /// Modifier keys changed.
    ModifiersChanged(Modifiers),
    /// A key was pressed.
    KeyDown(Key),
    /// A key was released.
    KeyUp(Key),
    /// The surface was resized.
    Resized { width: f32, height: f32 },
}

/// A pair of samples where `start` chases `end` every tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Sample<T> {
    start: T,
    end: T,
}

impl<T: Copy> Sample<T> {
    fn reset(&mut self, value: T) {
        self.start = value;
        self.end = value;
    }
}

/// Snapshot restored by [`TrackballControls::reset`].
#[derive(Debug, Clone, Copy, PartialEq)]
struct SavedState {
    position: Vec3,
    target: Vec3,
    up: Vec3,
}

/// Trackball controller owning the camera.
#[derive(Debug, Clone)]
pub struct TrackballControls {
    camera: Camera,
    viewport: Viewport,

    /// Rotation gain.
    pub rotate_speed: f32,
    /// Zoom gain.
    pub zoom_speed: f32,
    /// Pan gain.
    pub pan_speed: f32,
    /// Inertia decay in `(0, 1]`.
    pub damping_factor: f32,
    /// Disables rotation.
    pub no_rotate: bool,
    /// Disables zoom.
    pub no_zoom: bool,
    /// Disables panning.
    pub no_pan: bool,

    min_distance: f32,
    max_distance: f32,
    drag_threshold: f32,
    has_moved_debounce: Duration,

    enabled: bool,
    mode: InteractionMode,
    modifiers: Modifiers,

    rotate: Sample<Vec3>,
    zoom: Sample<Vec2>,
    pan: Sample<Vec2>,
    pinch: Sample<f32>,
    eye: Vec3,

    saved: SavedState,

    has_moved: bool,
    drag_distance: f32,
    last_pointer: Option<Vec2>,
    clock: Duration,
    released_at: Option<Duration>,
}

impl TrackballControls {
    /// Creates controls around `camera`.
    ///
    /// The camera pose at construction is the one [`reset`](Self::reset)
    /// returns to, until [`save_state`](Self::save_state) is called.
    pub fn new(camera: Camera, viewport: Viewport, options: &ControlsOptions) -> Result<Self> {
        options.validate()?;
        let mut camera = camera;
        camera.set_aspect_ratio(viewport.aspect_ratio());
        let saved = SavedState {
            position: camera.position,
            target: camera.target,
            up: camera.up,
        };
        let eye = camera.position - camera.target;
        Ok(Self {
            camera,
            viewport,
            rotate_speed: options.rotate_speed,
            zoom_speed: options.zoom_speed,
            pan_speed: options.pan_speed,
            damping_factor: options.damping_factor,
            no_rotate: options.no_rotate,
            no_zoom: options.no_zoom,
            no_pan: options.no_pan,
            min_distance: options.min_distance,
            max_distance: options.max_distance,
            drag_threshold: options.drag_threshold,
            has_moved_debounce: Duration::from_millis(options.has_moved_debounce_ms),
            enabled: true,
            mode: InteractionMode::None,
            modifiers: Modifiers::default(),
            rotate: Sample::default(),
            zoom: Sample::default(),
            pan: Sample::default(),
            pinch: Sample::default(),
            eye,
            saved,
            has_moved: false,
            drag_distance: 0.0,
            last_pointer: None,
            clock: Duration::ZERO,
            released_at: None,
        })
    }

    /// The controlled camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable access for the animator and the navigation commands.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// The screen area the controls map input from.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Updates the screen area and the camera aspect ratio.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.set_aspect_ratio(viewport.aspect_ratio());
    }

    /// Current interaction mode.
    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    /// True while a recent drag should suppress clicks.
    #[must_use]
    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    /// Whether input events are processed.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enables or disables input handling. Disabling drops the active mode.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.mode = InteractionMode::None;
            self.last_pointer = None;
        }
    }

    /// Closest allowed orbit distance.
    #[must_use]
    pub fn min_distance(&self) -> f32 {
        self.min_distance
    }

    /// Farthest allowed orbit distance.
    #[must_use]
    pub fn max_distance(&self) -> f32 {
        self.max_distance
    }

    /// Sets the closest allowed orbit distance.
    pub fn set_min_distance(&mut self, min_distance: f32) {
        if min_distance > self.max_distance {
            log::warn!(
                "min distance {min_distance} exceeds max distance {}; min wins when clamping",
                self.max_distance
            );
        }
        self.min_distance = min_distance.max(0.0);
    }

    /// Sets the farthest allowed orbit distance.
    pub fn set_max_distance(&mut self, max_distance: f32) {
        if max_distance < self.min_distance {
            log::warn!(
                "max distance {max_distance} is below min distance {}; min wins when clamping",
                self.min_distance
            );
        }
        self.max_distance = max_distance;
    }

    /// Sets both distance bounds at once.
    pub fn set_distance_bounds(&mut self, min_distance: f32, max_distance: f32) -> Result<()> {
        if min_distance < 0.0 || min_distance > max_distance {
            return Err(OrbisError::InvalidDistanceBounds {
                min: min_distance,
                max: max_distance,
            });
        }
        self.min_distance = min_distance;
        self.max_distance = max_distance;
        Ok(())
    }

    /// Dispatches an input event. Returns true if the event was used.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        if !self.enabled {
            return false;
        }
        match event {
            InputEvent::PointerDown { button, position } => {
                self.pointer_down(*button, *position);
                true
            }
            InputEvent::PointerMove { position } => self.pointer_move(*position),
            InputEvent::PointerUp { position, .. } => {
                self.pointer_up(*position);
                true
            }
            InputEvent::Wheel { delta } => {
                self.wheel(*delta);
                true
            }
            InputEvent::TouchStart { touches } => {
                self.touch_start(touches);
                true
            }
            InputEvent::TouchMove { touches } => {
                self.touch_move(touches);
                true
            }
            InputEvent::TouchEnd { touches } => {
                self.touch_end(touches);
                true
            }
            InputEvent::ModifiersChanged(modifiers) => {
                self.modifiers = *modifiers;
                false
            }
            InputEvent::KeyDown(Key::ZoomIn) => {
                self.wheel(WHEEL_NOTCH);
                true
            }
            InputEvent::KeyDown(Key::ZoomOut) => {
                self.wheel(-WHEEL_NOTCH);
                true
            }
            InputEvent::KeyDown(_) | InputEvent::KeyUp(_) => false,
            InputEvent::Resized { width, height } => {
                let mut viewport = self.viewport;
                viewport.width = *width;
                viewport.height = *height;
                self.set_viewport(viewport);
                false
            }
        }
    }

    fn eye_now(&self) -> Vec3 {
        self.camera.position - self.camera.target
    }

    fn ball(&self, position: Vec2) -> Vec3 {
        self.viewport
            .project_on_ball(position.x, position.y, self.eye_now(), self.camera.up)
    }

    fn screen(&self, position: Vec2) -> Vec2 {
        self.viewport.mouse_on_screen(position.x, position.y)
    }

    /// Starts a manipulation. Ignored while another one is active.
    pub fn pointer_down(&mut self, button: PointerButton, position: Vec2) {
        if self.mode == InteractionMode::None {
            self.mode = InteractionMode::from_button(button, self.modifiers);
            log::debug!("pointer down {button:?}: mode {:?}", self.mode);
        }
        self.drag_distance = 0.0;
        self.last_pointer = Some(position);

        match self.mode {
            InteractionMode::Rotate if !self.no_rotate => self.rotate.reset(self.ball(position)),
            InteractionMode::Zoom if !self.no_zoom => self.zoom.reset(self.screen(position)),
            InteractionMode::Pan if !self.no_pan => self.pan.reset(self.screen(position)),
            _ => {}
        }
    }

    /// Records pointer motion. Returns true if a manipulation is active.
    pub fn pointer_move(&mut self, position: Vec2) -> bool {
        let previous = self.last_pointer.replace(position);
        let active = match self.mode {
            InteractionMode::Rotate if !self.no_rotate => {
                self.rotate.end = self.ball(position);
                true
            }
            InteractionMode::Zoom if !self.no_zoom => {
                self.zoom.end = self.screen(position);
                true
            }
            InteractionMode::Pan if !self.no_pan => {
                self.pan.end = self.screen(position);
                true
            }
            _ => false,
        };
        if active {
            let step = previous.map_or(0.0, |p| p.distance(position));
            self.register_drag(step);
        }
        active
    }

    /// Ends the manipulation. Inertia keeps running.
    pub fn pointer_up(&mut self, _position: Vec2) {
        self.release();
    }

    /// Feeds a wheel delta into the zoom samples.
    pub fn wheel(&mut self, delta: f32) {
        if self.no_zoom {
            return;
        }
        self.zoom.start.y += delta * WHEEL_ZOOM_SCALE;
    }

    /// Starts a touch manipulation selected by the number of touches.
    pub fn touch_start(&mut self, touches: &[Vec2]) {
        self.mode = InteractionMode::from_touch_count(touches.len());
        self.drag_distance = 0.0;
        self.last_pointer = touches.first().copied();
        log::debug!("touch start x{}: mode {:?}", touches.len(), self.mode);

        match (self.mode, touches) {
            (InteractionMode::TouchRotate, [first, ..]) => self.rotate.reset(self.ball(*first)),
            (InteractionMode::TouchZoom, [a, b, ..]) => self.pinch.reset(a.distance(*b)),
            (InteractionMode::TouchPan, [first, ..]) => self.pan.reset(self.screen(*first)),
            _ => {}
        }
    }

    /// Records touch motion.
    pub fn touch_move(&mut self, touches: &[Vec2]) {
        let previous = self.last_pointer;
        match touches {
            [first] => self.rotate.end = self.ball(*first),
            [a, b] => self.pinch.end = a.distance(*b),
            [first, _, _] => self.pan.end = self.screen(*first),
            _ => {
                self.mode = InteractionMode::None;
                return;
            }
        }
        if let Some(first) = touches.first() {
            self.last_pointer = Some(*first);
            let step = previous.map_or(0.0, |p| p.distance(*first));
            self.register_drag(step);
        }
    }

    /// Ends the touch manipulation; `touches` are the fingers still down.
    pub fn touch_end(&mut self, touches: &[Vec2]) {
        match touches {
            [first] => self.rotate.reset(self.ball(*first)),
            [_, _] => self.pinch.reset(0.0),
            [first, _, _] => self.pan.reset(self.screen(*first)),
            _ => {}
        }
        self.release();
    }

    fn register_drag(&mut self, step: f32) {
        self.drag_distance += step;
        if self.drag_threshold <= 0.0 || self.drag_distance > self.drag_threshold {
            self.has_moved = true;
            self.released_at = None;
        }
    }

    fn release(&mut self) {
        if self.mode != InteractionMode::None {
            log::debug!("release: mode {:?} -> None", self.mode);
        }
        self.mode = InteractionMode::None;
        self.last_pointer = None;
        if self.has_moved {
            self.released_at = Some(self.clock);
        }
    }

    /// Restores the saved camera pose and stops every manipulation.
    pub fn reset(&mut self) {
        self.mode = InteractionMode::None;
        self.camera.position = self.saved.position;
        self.camera.target = self.saved.target;
        self.camera.up = self.saved.up;
        self.eye = self.eye_now();
        self.rotate.reset(Vec3::ZERO);
        self.zoom.reset(Vec2::ZERO);
        self.pan.reset(Vec2::ZERO);
        self.pinch.reset(0.0);
        self.camera.look_at(self.saved.target);
    }

    /// Makes the current camera pose the one [`reset`](Self::reset) restores.
    pub fn save_state(&mut self) {
        self.saved = SavedState {
            position: self.camera.position,
            target: self.camera.target,
            up: self.camera.up,
        };
    }

    /// Scales the orbit distance immediately, then clamps it.
    pub fn zoom(&mut self, factor: f32) {
        if factor <= 0.0 || !factor.is_finite() {
            return;
        }
        self.eye = self.eye_now() * factor;
        self.camera.position = self.camera.target + self.eye;
        self.check_distances();
    }

    /// True while any sample still carries motion to integrate.
    #[must_use]
    pub fn has_inertia(&self) -> bool {
        self.rotation_angle().is_some()
            || (self.zoom.end.y - self.zoom.start.y).abs() > MIN_SCREEN_DELTA
            || (self.pan.end - self.pan.start).length() > MIN_SCREEN_DELTA
    }

    /// Advances the manipulation by one frame.
    ///
    /// Steps: rotate, zoom, pan, recompose the position, clamp the orbit
    /// distance, look at the target.
    pub fn update(&mut self, dt: Duration) {
        self.clock += dt;
        if let Some(released_at) = self.released_at {
            if self.clock.saturating_sub(released_at) >= self.has_moved_debounce {
                self.has_moved = false;
                self.released_at = None;
            }
        }

        self.eye = self.eye_now();

        if !self.no_rotate {
            self.rotate_camera();
        }
        if !self.no_zoom {
            self.zoom_camera();
        }
        if !self.no_pan {
            self.pan_camera();
        }

        self.camera.position = self.camera.target + self.eye;
        self.check_distances();
        self.camera.look_at(self.camera.target);
    }

    fn rotation_angle(&self) -> Option<(Vec3, f32)> {
        let (start, end) = (self.rotate.start, self.rotate.end);
        let lengths = start.length() * end.length();
        if lengths <= f32::EPSILON {
            return None;
        }
        let angle = (start.dot(end) / lengths).clamp(-1.0, 1.0).acos();
        if !(angle > MIN_ROTATION_ANGLE) {
            return None;
        }
        let axis = start.cross(end).normalize_or_zero();
        if axis == Vec3::ZERO {
            return None;
        }
        Some((axis, angle))
    }

    fn rotate_camera(&mut self) {
        let Some((axis, angle)) = self.rotation_angle() else {
            return;
        };
        let angle = angle * self.rotate_speed;

        let quaternion = Quat::from_axis_angle(axis, -angle);
        self.eye = quaternion * self.eye;
        self.camera.up = quaternion * self.camera.up;
        self.rotate.end = quaternion * self.rotate.end;

        let decay = Quat::from_axis_angle(axis, angle * (self.damping_factor - 1.0));
        self.rotate.start = decay * self.rotate.start;
        log::trace!("rotate {angle:.6} rad about {axis:?}");
    }

    fn zoom_camera(&mut self) {
        if self.mode == InteractionMode::TouchZoom {
            let (start, end) = (self.pinch.start, self.pinch.end);
            if end > 0.0 && start > 0.0 {
                self.eye *= start / end;
            }
            self.pinch.start = end;
            return;
        }

        let delta = self.zoom.end.y - self.zoom.start.y;
        if delta.abs() <= MIN_SCREEN_DELTA {
            self.zoom.start.y = self.zoom.end.y;
            return;
        }
        let factor = 1.0 + delta * self.zoom_speed;
        if factor > 0.0 {
            self.eye *= factor;
            self.zoom.start.y += delta * self.damping_factor;
        }
    }

    fn pan_camera(&mut self) {
        let change = self.pan.end - self.pan.start;
        if change.length() <= MIN_SCREEN_DELTA {
            self.pan.start = self.pan.end;
            return;
        }
        let scaled = change * (self.eye.length() * self.pan_speed);
        let up = self.camera.up;
        let pan = with_length(self.eye.cross(up), scaled.x) + with_length(up, scaled.y);

        self.camera.position += pan;
        self.camera.target += pan;
        self.pan.start += change * self.damping_factor;
    }

    fn check_distances(&mut self) {
        let eye = self.camera.position - self.camera.target;
        let distance_sq = eye.length_squared();
        let corrected = if distance_sq > self.max_distance * self.max_distance {
            Some(with_length(eye, self.max_distance))
        } else if distance_sq < self.min_distance * self.min_distance {
            let direction = if distance_sq > f32::EPSILON { eye } else { Vec3::Z };
            Some(with_length(direction, self.min_distance))
        } else {
            None
        };
        if let Some(eye) = corrected {
            self.camera.position = self.camera.target + eye;
            self.eye = eye;
        }
        // min wins over an inverted max
        if self.min_distance > self.max_distance {
            let eye = with_length(self.camera.position - self.camera.target, self.min_distance);
            if eye != Vec3::ZERO {
                self.camera.position = self.camera.target + eye;
                self.eye = eye;
            }
        }
    }
}
