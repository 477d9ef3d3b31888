//! winit adapter: turns window events into controller input and clicks.

use std::collections::BTreeMap;

use glam::Vec2;
use orbis_render::{InputEvent, Key, Modifiers, PointerButton, WHEEL_NOTCH};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, TouchPhase, WindowEvent};
use winit::keyboard::{Key as WinitKey, ModifiersState, NamedKey};

/// Pixel scroll units per browser-normalized wheel unit.
const PIXELS_PER_WHEEL_UNIT: f32 = 40.0;

/// Output of the adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// Raw input for the controls and key navigation.
    Input(InputEvent),
    /// A click or single-finger tap at a window position.
    Click(Vec2),
}

/// Stateful translation of winit window events.
///
/// Tracks the cursor, which is not part of winit's button events, and the
/// set of active touches, since winit reports fingers one at a time.
#[derive(Debug, Default, Clone)]
pub struct InputAdapter {
    cursor: Vec2,
    touches: BTreeMap<u64, Vec2>,
    tap: Option<u64>,
}

impl InputAdapter {
    /// Creates an adapter with no active touches.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known cursor position.
    #[must_use]
    pub fn cursor(&self) -> Vec2 {
        self.cursor
    }

    /// Number of fingers currently down.
    #[must_use]
    pub fn touch_count(&self) -> usize {
        self.touches.len()
    }

    /// Translates one window event. Unrelated events produce nothing.
    pub fn translate(&mut self, event: &WindowEvent) -> Vec<ViewEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => vec![self.cursor_moved(*position)],
            WindowEvent::MouseInput { state, button, .. } => self.mouse_input(*state, *button),
            WindowEvent::MouseWheel { delta, .. } => vec![Self::mouse_wheel(*delta)],
            WindowEvent::Touch(touch) => self.touch(touch.id, touch.phase, touch.location),
            WindowEvent::KeyboardInput { event, .. } => {
                Self::key(&event.logical_key, event.state).into_iter().collect()
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                vec![Self::modifiers(modifiers.state())]
            }
            WindowEvent::Resized(size) => vec![Self::resized(*size)],
            _ => Vec::new(),
        }
    }

    /// Records the cursor and reports a pointer move.
    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>) -> ViewEvent {
        self.cursor = to_vec2(position);
        ViewEvent::Input(InputEvent::PointerMove {
            position: self.cursor,
        })
    }

    /// Reports a button press or release; a left release also clicks.
    pub fn mouse_input(&mut self, state: ElementState, button: MouseButton) -> Vec<ViewEvent> {
        let button = match button {
            MouseButton::Left => PointerButton::Primary,
            MouseButton::Middle => PointerButton::Middle,
            MouseButton::Right => PointerButton::Secondary,
            _ => PointerButton::Other,
        };
        let position = self.cursor;
        match state {
            ElementState::Pressed => {
                vec![ViewEvent::Input(InputEvent::PointerDown { button, position })]
            }
            ElementState::Released => {
                let mut out = vec![ViewEvent::Input(InputEvent::PointerUp { button, position })];
                if button == PointerButton::Primary {
                    out.push(ViewEvent::Click(position));
                }
                out
            }
        }
    }

    /// Converts a scroll into browser-normalized wheel units.
    pub fn mouse_wheel(delta: MouseScrollDelta) -> ViewEvent {
        let delta = match delta {
            MouseScrollDelta::LineDelta(_, y) => y * WHEEL_NOTCH,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_WHEEL_UNIT,
        };
        ViewEvent::Input(InputEvent::Wheel { delta })
    }

    /// Updates the touch set and reports it; lifting the only finger of a
    /// one-finger gesture clicks.
    pub fn touch(
        &mut self,
        id: u64,
        phase: TouchPhase,
        location: PhysicalPosition<f64>,
    ) -> Vec<ViewEvent> {
        let position = to_vec2(location);
        match phase {
            TouchPhase::Started => {
                self.touches.insert(id, position);
                self.tap = (self.touches.len() == 1).then_some(id);
                vec![ViewEvent::Input(InputEvent::TouchStart {
                    touches: self.active_touches(),
                })]
            }
            TouchPhase::Moved => {
                self.touches.insert(id, position);
                vec![ViewEvent::Input(InputEvent::TouchMove {
                    touches: self.active_touches(),
                })]
            }
            TouchPhase::Ended => {
                self.touches.remove(&id);
                let mut out = vec![ViewEvent::Input(InputEvent::TouchEnd {
                    touches: self.active_touches(),
                })];
                if self.tap == Some(id) && self.touches.is_empty() {
                    out.push(ViewEvent::Click(position));
                }
                if self.touches.is_empty() {
                    self.tap = None;
                }
                out
            }
            TouchPhase::Cancelled => {
                self.touches.remove(&id);
                self.tap = None;
                vec![ViewEvent::Input(InputEvent::TouchEnd {
                    touches: self.active_touches(),
                })]
            }
        }
    }

    /// Maps navigation and zoom keys; anything else yields `None`.
    pub fn key(key: &WinitKey, state: ElementState) -> Option<ViewEvent> {
        let key = match key {
            WinitKey::Named(NamedKey::ArrowLeft) => Key::Left,
            WinitKey::Named(NamedKey::ArrowRight) => Key::Right,
            WinitKey::Character(c) => match c.as_str() {
                "q" | "Q" => Key::Left,
                "d" | "D" => Key::Right,
                "+" | "=" => Key::ZoomIn,
                "-" => Key::ZoomOut,
                _ => return None,
            },
            _ => return None,
        };
        let event = match state {
            ElementState::Pressed => InputEvent::KeyDown(key),
            ElementState::Released => InputEvent::KeyUp(key),
        };
        Some(ViewEvent::Input(event))
    }

    /// Reports the modifier keys that alter a primary press.
    pub fn modifiers(state: ModifiersState) -> ViewEvent {
        ViewEvent::Input(InputEvent::ModifiersChanged(Modifiers {
            shift: state.shift_key(),
            ctrl: state.control_key(),
        }))
    }

    /// Reports a new surface size.
    pub fn resized(size: PhysicalSize<u32>) -> ViewEvent {
        ViewEvent::Input(InputEvent::Resized {
            width: size.width as f32,
            height: size.height as f32,
        })
    }

    fn active_touches(&self) -> Vec<Vec2> {
        self.touches.values().copied().collect()
    }
}

fn to_vec2(position: PhysicalPosition<f64>) -> Vec2 {
    Vec2::new(position.x as f32, position.y as f32)
}
