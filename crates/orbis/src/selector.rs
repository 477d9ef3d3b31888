//! Click resolution and the country selection state machine.
//!
//! A click casts a ray from the camera and tests markers first, then surface
//! parts. Markers win regardless of depth. Every surface part sharing the hit
//! identifier is selected together.

use std::collections::HashSet;

use glam::{Vec2, Vec3};
use orbis_core::pick::ray_intersect_sphere;
use orbis_core::{pick_nearest, CountryInfo, OrbisError, Pickable, Result, SceneOptions, SelectionEvent};
use orbis_render::{CameraAnimator, TrackballControls};

use crate::navigation::Navigator;
use crate::pickable::{Marker, SurfacePart};
use crate::scene::OrbitingBody;

/// Function run when a pickable is clicked.
///
/// The default is [`PickingSelector::country_clicked`].
pub type ClickCallback = fn(&mut ClickContext<'_>, PickTarget);

/// The pickable a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickTarget {
    /// Index into [`PickingSelector::markers`].
    Marker(usize),
    /// Index into [`PickingSelector::surfaces`].
    Surface(usize),
}

/// What a click did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The pointer was dragging; nothing changed.
    IgnoredDrag,
    /// A country was hit and its callback ran.
    Selected(PickTarget),
    /// The secondary body was hit; the camera flies to it.
    SecondaryBody,
    /// Nothing selectable was hit; the selection was cleared.
    Unselected,
}

/// Phase of the selection state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    /// Nothing selected.
    Idle,
    /// A country with a marker is selected.
    MarkerSelected,
    /// A country without a marker is selected through its surfaces.
    SurfaceSelected,
}

/// The current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected_identifier: Option<String>,
    selected_marker: Option<usize>,
    selected_surfaces: Vec<usize>,
}

impl SelectionState {
    /// Identifier of the selected country.
    pub fn selected_identifier(&self) -> Option<&str> {
        self.selected_identifier.as_deref()
    }

    /// Index of the selected marker.
    pub fn selected_marker(&self) -> Option<usize> {
        self.selected_marker
    }

    /// Indices of every selected surface part.
    pub fn selected_surfaces(&self) -> &[usize] {
        &self.selected_surfaces
    }

    /// True when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected_identifier.is_none()
            && self.selected_marker.is_none()
            && self.selected_surfaces.is_empty()
    }

    /// Phase derived from the selected objects.
    pub fn phase(&self) -> SelectionPhase {
        if self.selected_marker.is_some() {
            SelectionPhase::MarkerSelected
        } else if self.selected_surfaces.is_empty() {
            SelectionPhase::Idle
        } else {
            SelectionPhase::SurfaceSelected
        }
    }
}

/// Highlight colors and opacities.
#[derive(Debug, Clone, PartialEq)]
struct SelectionStyle {
    marker_color: Vec3,
    marker_selected_color: Vec3,
    surface_selected_opacity: f32,
}

/// Everything a click callback may touch.
///
/// Built by the view for the duration of one click.
pub struct ClickContext<'a> {
    /// The selector that resolved the click.
    pub selector: &'a mut PickingSelector,
    /// Camera controls.
    pub controls: &'a mut TrackballControls,
    /// Camera tweens.
    pub animator: &'a mut CameraAnimator,
    /// Auto-rotation and navigation state.
    pub navigator: &'a mut Navigator,
    /// The secondary body, when the scene has one.
    pub body: Option<&'a OrbitingBody>,
    /// External selection callback.
    pub on_selected: &'a mut dyn FnMut(SelectionEvent),
}

impl ClickContext<'_> {
    /// Sends `event` to the external callback.
    pub fn notify(&mut self, event: SelectionEvent) {
        (self.on_selected)(event);
    }
}

/// Owns the pickables and the selection built from them.
#[derive(Debug, Clone)]
pub struct PickingSelector {
    markers: Vec<Marker>,
    surfaces: Vec<SurfacePart>,
    state: SelectionState,
    style: SelectionStyle,
    globe_radius: f32,
    scene_radius: f32,
}

impl PickingSelector {
    /// Creates a selector. Marker identifiers must be unique.
    pub fn new(
        markers: Vec<Marker>,
        surfaces: Vec<SurfacePart>,
        options: &SceneOptions,
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        for marker in &markers {
            if !seen.insert(marker.info().identifier.as_str()) {
                return Err(OrbisError::DuplicateMarker(marker.info().identifier.clone()));
            }
        }

        let mut selector = Self {
            markers,
            surfaces,
            state: SelectionState::default(),
            style: SelectionStyle {
                marker_color: options.marker_color,
                marker_selected_color: options.marker_selected_color,
                surface_selected_opacity: options.surface_selected_opacity,
            },
            globe_radius: options.globe_radius,
            scene_radius: options.scene_radius,
        };
        for marker in &mut selector.markers {
            marker.set_color(selector.style.marker_color);
        }
        for part in &mut selector.surfaces {
            part.set_opacity(0.0);
        }
        Ok(selector)
    }

    /// All markers.
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// All surface parts.
    pub fn surfaces(&self) -> &[SurfacePart] {
        &self.surfaces
    }

    /// The current selection.
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Metadata of a pickable.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of range.
    pub fn info(&self, target: PickTarget) -> &CountryInfo {
        match target {
            PickTarget::Marker(index) => self.markers[index].info(),
            PickTarget::Surface(index) => self.surfaces[index].info(),
        }
    }

    /// Clears the selection and restores idle visuals.
    ///
    /// Calling it on an empty selection changes nothing.
    pub fn unselect(&mut self) {
        if self.state.is_empty() {
            return;
        }
        if let Some(index) = self.state.selected_marker.take() {
            self.markers[index].set_color(self.style.marker_color);
        }
        for index in self.state.selected_surfaces.drain(..) {
            self.surfaces[index].set_opacity(0.0);
        }
        if let Some(identifier) = self.state.selected_identifier.take() {
            log::debug!("unselected {identifier}");
        }
    }

    /// Selects a country by identifier without moving the camera.
    ///
    /// Returns false, leaving nothing selected, if no pickable carries it.
    pub fn select_country(&mut self, identifier: &str) -> bool {
        self.unselect();
        self.highlight(identifier)
    }

    /// Highlights the marker and every surface part of `identifier` and
    /// records them as the selection.
    fn highlight(&mut self, identifier: &str) -> bool {
        self.state.selected_marker = None;
        for (index, marker) in self.markers.iter_mut().enumerate() {
            if marker.info().identifier == identifier {
                marker.set_color(self.style.marker_selected_color);
                self.state.selected_marker = Some(index);
                break;
            }
        }

        self.state.selected_surfaces.clear();
        for (index, part) in self.surfaces.iter_mut().enumerate() {
            if part.info().identifier == identifier {
                part.set_opacity(self.style.surface_selected_opacity);
                self.state.selected_surfaces.push(index);
            }
        }

        let found = self.state.selected_marker.is_some() || !self.state.selected_surfaces.is_empty();
        if found {
            log::debug!(
                "selected {identifier}: marker {:?}, {} surface parts",
                self.state.selected_marker,
                self.state.selected_surfaces.len()
            );
            self.state.selected_identifier = Some(identifier.to_owned());
        } else {
            log::warn!("no marker or surface for country {identifier}");
            self.state.selected_identifier = None;
        }
        found
    }

    /// Point on the globe the camera should face to frame `identifier`.
    ///
    /// Tries the country's geographic center, then its marker anchor, then
    /// the centroid of its surface parts.
    pub fn country_center(&self, identifier: &str) -> Option<Vec3> {
        let marker = self.markers.iter().find(|m| m.info().identifier == identifier);
        let mut parts = self
            .surfaces
            .iter()
            .filter(|p| p.info().identifier == identifier)
            .peekable();

        let center = marker
            .and_then(|m| m.info().center)
            .or_else(|| parts.peek().and_then(|p| p.info().center));
        if let Some(center) = center {
            return Some(center.to_cartesian(self.globe_radius));
        }
        if let Some(marker) = marker {
            return Some(marker.anchor());
        }

        let (sum, count) = parts.fold((Vec3::ZERO, 0_usize), |(sum, count), part| {
            (sum + part.centroid(), count + 1)
        });
        if count == 0 {
            return None;
        }
        let direction = (sum / count as f32).normalize_or_zero();
        (direction != Vec3::ZERO).then(|| direction * self.globe_radius)
    }

    /// Indices of every surface part of `identifier`.
    fn parts_of(&self, identifier: &str) -> Vec<usize> {
        self.surfaces
            .iter()
            .enumerate()
            .filter(|(_, p)| p.info().identifier == identifier)
            .map(|(i, _)| i)
            .collect()
    }

    /// Checks that the selected marker and surfaces all carry the selected
    /// identifier, and that every surface part of it is selected.
    pub fn selection_is_consistent(&self) -> bool {
        let Some(identifier) = self.state.selected_identifier.as_deref() else {
            return self.state.selected_marker.is_none() && self.state.selected_surfaces.is_empty();
        };
        let marker_ok = self
            .state
            .selected_marker
            .is_none_or(|i| self.markers[i].info().identifier == identifier);
        let expected = self.parts_of(identifier);
        marker_ok && self.state.selected_surfaces == expected
    }

    /// Resolves a click at normalized device coordinates.
    pub fn click(cx: &mut ClickContext<'_>, ndc: Vec2) -> ClickOutcome {
        if cx.controls.has_moved() {
            log::debug!("click ignored: end of a drag");
            return ClickOutcome::IgnoredDrag;
        }

        let previous = cx.selector.state.selected_identifier.clone();
        cx.selector.unselect();

        let camera = cx.controls.camera();
        let (ray, reach) = (camera.ray_through(ndc), camera.position.length());
        let Some(ray) = ray else {
            log::debug!("click ignored: degenerate camera");
            cx.notify(SelectionEvent::Unselected);
            return ClickOutcome::Unselected;
        };
        // Stop at the globe center so the far side stays out of reach
        let near_ray = ray.with_far(reach);
        let differs = |info: &CountryInfo| previous.as_deref() != Some(info.identifier.as_str());

        if let Some(hit) = pick_nearest(&cx.selector.markers, &near_ray) {
            let marker = &cx.selector.markers[hit.index];
            if differs(marker.country()) {
                let identifier = marker.info().identifier.clone();
                let callback = marker.click_callback();
                cx.selector.state.selected_surfaces = cx.selector.parts_of(&identifier);
                cx.selector.state.selected_identifier = Some(identifier);
                cx.selector.state.selected_marker = Some(hit.index);
                let target = PickTarget::Marker(hit.index);
                callback(cx, target);
                return ClickOutcome::Selected(target);
            }
        }

        if let Some(hit) = pick_nearest(&cx.selector.surfaces, &near_ray) {
            let part = &cx.selector.surfaces[hit.index];
            if differs(part.country()) {
                let identifier = part.info().identifier.clone();
                let callback = part.click_callback();
                cx.selector.state.selected_surfaces = cx.selector.parts_of(&identifier);
                cx.selector.state.selected_identifier = Some(identifier);
                let target = PickTarget::Surface(hit.index);
                callback(cx, target);
                return ClickOutcome::Selected(target);
            }
        }

        let scene_ray = ray.with_far(cx.selector.scene_radius);
        if let Some(body) = cx.body {
            if ray_intersect_sphere(&scene_ray, body.position(), body.radius()).is_some() {
                log::debug!("secondary body clicked");
                cx.navigator
                    .move_to_body(body.position(), cx.controls, cx.animator);
                cx.notify(SelectionEvent::Unselected);
                return ClickOutcome::SecondaryBody;
            }
        }
        if ray_intersect_sphere(&scene_ray, Vec3::ZERO, cx.selector.globe_radius).is_some() {
            cx.navigator.release_body_lock();
            cx.navigator.disable_auto_rotate();
        }
        cx.notify(SelectionEvent::Unselected);
        ClickOutcome::Unselected
    }

    /// Default click callback shared by markers and surface parts.
    ///
    /// Highlights the clicked country, stops auto-rotation, flies the camera
    /// over the country at its current distance, then notifies the
    /// collaborator.
    pub fn country_clicked(cx: &mut ClickContext<'_>, target: PickTarget) {
        let info = cx.selector.info(target).clone();
        cx.selector.highlight(&info.identifier);
        cx.navigator.disable_auto_rotate();

        if let Some(center) = cx.selector.country_center(&info.identifier) {
            let camera = cx.controls.camera();
            let to = center.normalize_or_zero() * camera.position.length();
            if to != Vec3::ZERO {
                cx.animator.animate_position(camera, to);
            }
        }
        cx.notify(SelectionEvent::Selected(info));
    }
}
