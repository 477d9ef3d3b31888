//! Ray casting primitives used by the picking selector.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::country::CountryInfo;

/// A half-line with a bounded reach.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin in world space.
    pub origin: Vec3,
    /// Unit direction.
    pub dir: Vec3,
    /// Hits farther than this distance along the ray are ignored.
    pub far: f32,
}

impl Ray {
    /// Creates a ray, normalizing `dir`. Returns `None` for a zero direction.
    pub fn new(origin: Vec3, dir: Vec3) -> Option<Self> {
        let dir = dir.normalize_or_zero();
        if dir.length_squared() < 1e-12 {
            return None;
        }
        Some(Self {
            origin,
            dir,
            far: f32::INFINITY,
        })
    }

    /// Builds the ray through normalized device coordinates.
    ///
    /// `inv_view_proj` is the inverse of a projection * view matrix using the
    /// `[0, 1]` depth range.
    pub fn from_ndc(ndc: Vec2, inv_view_proj: Mat4) -> Option<Self> {
        let near = inv_view_proj * Vec4::new(ndc.x, ndc.y, 0.0, 1.0);
        let far = inv_view_proj * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);

        if near.w.abs() < 1e-6 || far.w.abs() < 1e-6 {
            return None;
        }

        let ray_origin = near.truncate() / near.w;
        let ray_far = far.truncate() / far.w;
        Self::new(ray_origin, ray_far - ray_origin)
    }

    /// Returns a copy of this ray limited to `far`.
    #[must_use]
    pub fn with_far(mut self, far: f32) -> Self {
        self.far = far;
        self
    }

    /// Returns the point at distance `t` along the ray.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// Returns `Some(t)` if `t` lies within `[0, far]`.
    pub fn within_reach(&self, t: f32) -> Option<f32> {
        (t >= 0.0 && t <= self.far).then_some(t)
    }
}

/// Möller-Trumbore ray/triangle intersection. Returns the distance along the ray.
pub fn ray_intersect_triangle(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    let eps = 1e-7;
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.dir.cross(edge2);
    let a = edge1.dot(h);
    if a.abs() < eps {
        return None;
    }
    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = f * ray.dir.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = f * edge2.dot(q);
    if t > eps {
        ray.within_reach(t)
    } else {
        None
    }
}

/// Distance along the ray of the point closest to segment `a`-`b`, together
/// with the distance between that point and the segment.
pub fn ray_segment_closest(ray: &Ray, a: Vec3, b: Vec3) -> (f32, f32) {
    let v = b - a;
    let c = v.dot(v);
    let w0 = ray.origin - a;

    let (s, t) = if c < 1e-12 {
        (0.0, ray.dir.dot(a - ray.origin))
    } else {
        let b_dot = ray.dir.dot(v);
        let d = ray.dir.dot(w0);
        let e = v.dot(w0);
        // ray.dir is unit length, so a_dot == 1
        let denom = c - b_dot * b_dot;
        if denom.abs() < 1e-8 {
            // Parallel: the endpoint met first along the ray
            let (ta, tb) = (ray.dir.dot(a - ray.origin), ray.dir.dot(b - ray.origin));
            if ta <= tb {
                (0.0, ta)
            } else {
                (1.0, tb)
            }
        } else {
            ((b_dot * d - e) / denom, (b_dot * e - c * d) / denom)
        }
    };

    let (s, t) = if s < 0.0 {
        (0.0, ray.dir.dot(a - ray.origin))
    } else if s > 1.0 {
        (1.0, ray.dir.dot(b - ray.origin))
    } else {
        (s, t)
    };

    let t = t.max(0.0);
    let gap = (ray.at(t) - (a + v * s)).length();
    (t, gap)
}

/// Nearest intersection of the ray with a sphere.
pub fn ray_intersect_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_d = discriminant.sqrt();
    let near = -b - sqrt_d;
    let t = if near >= 0.0 { near } else { -b + sqrt_d };
    ray.within_reach(t)
}

/// A hit against one element of a pickable collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Index of the element within the collection that was tested.
    pub index: usize,
    /// Distance along the ray.
    pub distance: f32,
    /// World position of the hit.
    pub point: Vec3,
}

/// Trait for objects that can be hit by a picking ray.
pub trait Pickable {
    /// Metadata of the country this object belongs to.
    fn country(&self) -> &CountryInfo;

    /// Distance along `ray` to the first intersection within its reach.
    fn intersect_ray(&self, ray: &Ray) -> Option<f32>;
}

/// Returns the nearest hit among `items`.
///
/// Equal distances resolve to the lower index so picking is deterministic.
pub fn pick_nearest<P: Pickable>(items: &[P], ray: &Ray) -> Option<PickHit> {
    let mut best: Option<PickHit> = None;
    for (index, item) in items.iter().enumerate() {
        let Some(distance) = item.intersect_ray(ray) else {
            continue;
        };
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(PickHit {
                index,
                distance,
                point: ray.at(distance),
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ray_down_z() -> Ray {
        Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z).unwrap()
    }

    #[test]
    fn test_zero_direction_rejected() {
        assert!(Ray::new(Vec3::ZERO, Vec3::ZERO).is_none());
    }

    #[test]
    fn test_triangle_hit_and_miss() {
        let ray = ray_down_z();
        let t = ray_intersect_triangle(
            &ray,
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        assert!((t.unwrap() - 5.0).abs() < 1e-5);

        let miss = ray_intersect_triangle(
            &ray,
            Vec3::new(2.0, 2.0, 0.0),
            Vec3::new(3.0, 2.0, 0.0),
            Vec3::new(2.0, 3.0, 0.0),
        );
        assert!(miss.is_none());
    }

    #[test]
    fn test_far_bound_limits_hits() {
        let ray = ray_down_z().with_far(4.0);
        let t = ray_intersect_triangle(
            &ray,
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        assert!(t.is_none());
    }

    #[test]
    fn test_sphere_front_face() {
        let ray = ray_down_z();
        let t = ray_intersect_sphere(&ray, Vec3::ZERO, 1.0).unwrap();
        assert!((t - 4.0).abs() < 1e-5);
        assert!(ray_intersect_sphere(&ray, Vec3::new(3.0, 0.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn test_segment_closest_gap() {
        let ray = ray_down_z();
        let (t, gap) =
            ray_segment_closest(&ray, Vec3::new(0.5, 0.0, 1.0), Vec3::new(0.5, 0.0, 2.0));
        assert!((gap - 0.5).abs() < 1e-5);
        assert!((3.0..=4.0).contains(&t));
    }

    #[test]
    fn test_from_ndc_center_ray() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(1.0, 1.0, 0.1, 100.0);
        let ray = Ray::from_ndc(Vec2::ZERO, (proj * view).inverse()).unwrap();
        assert!((ray.dir - Vec3::NEG_Z).length() < 1e-4);
        assert!((ray.origin.z - 2.9).abs() < 1e-3);
    }

    struct Dot(CountryInfo, Vec3);

    impl Pickable for Dot {
        fn country(&self) -> &CountryInfo {
            &self.0
        }

        fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
            ray_intersect_sphere(ray, self.1, 0.1)
        }
    }

    #[test]
    fn test_pick_nearest_prefers_closest() {
        let items = vec![
            Dot(CountryInfo::new("FAR", ""), Vec3::new(0.0, 0.0, -1.0)),
            Dot(CountryInfo::new("NEAR", ""), Vec3::new(0.0, 0.0, 1.0)),
        ];
        let hit = pick_nearest(&items, &ray_down_z()).unwrap();
        assert_eq!(hit.index, 1);
        assert_eq!(items[hit.index].country().identifier, "NEAR");
    }
}
