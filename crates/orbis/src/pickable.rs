//! Clickable globe objects: country markers and country surface parts.

use glam::Vec3;
use orbis_core::pick::{ray_intersect_triangle, ray_segment_closest};
use orbis_core::{CountryInfo, OrbisError, Pickable, Ray, Result};

use crate::selector::{ClickCallback, PickingSelector};

/// Full marker height along the surface normal, at scale 1.
pub const MARKER_HEIGHT: f32 = 0.1;

/// Base marker radius. The drawn and picked radius is `MARKER_WIDTH * (1 + scale)`.
pub const MARKER_WIDTH: f32 = 0.002;

/// Smallest marker scale, so low-value countries stay visible.
pub const MIN_MARKER_SCALE: f32 = 0.25;

/// A pin standing on the globe at a country's center.
///
/// The pin is a cylinder centered on its anchor and aligned with the surface
/// normal, so half of it is sunk into the globe.
#[derive(Debug, Clone)]
pub struct Marker {
    info: CountryInfo,
    anchor: Vec3,
    scale: f32,
    color: Vec3,
    click_callback: ClickCallback,
}

impl Marker {
    /// Creates a marker anchored at `info.center` on a sphere of `globe_radius`.
    pub fn new(info: CountryInfo, globe_radius: f32) -> Result<Self> {
        let center = info
            .center
            .ok_or_else(|| OrbisError::MissingCenter(info.identifier.clone()))?;
        let anchor = center.to_cartesian(globe_radius);
        Ok(Self {
            info,
            anchor,
            scale: 1.0,
            color: Vec3::ONE,
            click_callback: PickingSelector::country_clicked,
        })
    }

    /// Sets the height scale, clamped to `[MIN_MARKER_SCALE, 1]`.
    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale.clamp(MIN_MARKER_SCALE, 1.0);
        self
    }

    /// Replaces the function run when this marker is clicked.
    #[must_use]
    pub fn with_click_callback(mut self, callback: ClickCallback) -> Self {
        self.click_callback = callback;
        self
    }

    /// Country metadata.
    pub fn info(&self) -> &CountryInfo {
        &self.info
    }

    /// Center of the pin, on the globe surface.
    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    /// Height scale in `[MIN_MARKER_SCALE, 1]`.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Pin height.
    pub fn height(&self) -> f32 {
        MARKER_HEIGHT * self.scale
    }

    /// Pin radius, also used as the picking radius.
    pub fn radius(&self) -> f32 {
        MARKER_WIDTH + MARKER_WIDTH * self.scale
    }

    /// Current display color.
    pub fn color(&self) -> Vec3 {
        self.color
    }

    pub(crate) fn set_color(&mut self, color: Vec3) {
        self.color = color;
    }

    pub(crate) fn click_callback(&self) -> ClickCallback {
        self.click_callback
    }

    /// Bottom and top of the pin axis.
    pub fn axis(&self) -> (Vec3, Vec3) {
        let normal = self.anchor.normalize_or_zero();
        let half = normal * (self.height() * 0.5);
        (self.anchor - half, self.anchor + half)
    }
}

impl Pickable for Marker {
    fn country(&self) -> &CountryInfo {
        &self.info
    }

    fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let (bottom, top) = self.axis();
        let (t, gap) = ray_segment_closest(ray, bottom, top);
        if gap <= self.radius() {
            ray.within_reach(t)
        } else {
            None
        }
    }
}

/// One polygon piece of a country's area.
///
/// Countries split by the anti-meridian or made of islands own several parts
/// sharing the same identifier.
#[derive(Debug, Clone)]
pub struct SurfacePart {
    info: CountryInfo,
    triangles: Vec<[Vec3; 3]>,
    opacity: f32,
    click_callback: ClickCallback,
}

impl SurfacePart {
    /// Creates a surface part from world-space triangles.
    pub fn new(info: CountryInfo, triangles: Vec<[Vec3; 3]>) -> Result<Self> {
        if triangles.is_empty() {
            return Err(OrbisError::EmptySurface(info.identifier));
        }
        Ok(Self {
            info,
            triangles,
            opacity: 0.0,
            click_callback: PickingSelector::country_clicked,
        })
    }

    /// Creates a surface part from an indexed mesh.
    ///
    /// Faces referencing missing vertices are dropped.
    pub fn from_indexed(info: CountryInfo, vertices: &[Vec3], faces: &[[u32; 3]]) -> Result<Self> {
        let triangles = faces
            .iter()
            .filter_map(|face| {
                let v = |i: u32| vertices.get(i as usize).copied();
                Some([v(face[0])?, v(face[1])?, v(face[2])?])
            })
            .collect();
        Self::new(info, triangles)
    }

    /// Replaces the function run when this part is clicked.
    #[must_use]
    pub fn with_click_callback(mut self, callback: ClickCallback) -> Self {
        self.click_callback = callback;
        self
    }

    /// Country metadata.
    pub fn info(&self) -> &CountryInfo {
        &self.info
    }

    /// World-space triangles.
    pub fn triangles(&self) -> &[[Vec3; 3]] {
        &self.triangles
    }

    /// Current overlay opacity; 0 when not selected.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub(crate) fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }

    pub(crate) fn click_callback(&self) -> ClickCallback {
        self.click_callback
    }

    /// Mean of all triangle vertices.
    pub fn centroid(&self) -> Vec3 {
        let sum: Vec3 = self.triangles.iter().flatten().copied().sum();
        sum / (self.triangles.len() * 3) as f32
    }
}

impl Pickable for SurfacePart {
    fn country(&self) -> &CountryInfo {
        &self.info
    }

    fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        self.triangles
            .iter()
            .filter_map(|[a, b, c]| ray_intersect_triangle(ray, *a, *b, *c))
            .min_by(f32::total_cmp)
    }
}
