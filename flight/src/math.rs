use std::f32::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

pub use bevy_math::{Vec2 as Vec2f, Vec3 as Vec3f};

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3f,
    pub max: Vec3f,
}

impl Aabb {
    pub const fn new(min: Vec3f, max: Vec3f) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: Vec3f, half_extents: Vec3f) -> Self {
        let half = half_extents.abs();
        Self { min: center - half, max: center + half }
    }

    pub fn size(&self) -> Vec3f {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3f {
        (self.min + self.max) * 0.5
    }

    pub fn translated(&self, offset: Vec3f) -> Self {
        Self { min: self.min + offset, max: self.max + offset }
    }

    pub fn union(&self, other: &Aabb) -> Self {
        Self { min: self.min.min(other.min), max: self.max.max(other.max) }
    }

    /// Point inside (or on) the box closest to `p`.
    pub fn closest_point(&self, p: Vec3f) -> Vec3f {
        // max-then-min instead of `clamp` so an inverted box cannot panic in debug builds
        p.max(self.min).min(self.max)
    }

    /// Distance from `p` to the box surface; zero when `p` is inside.
    pub fn distance_to_point(&self, p: Vec3f) -> f32 {
        self.closest_point(p).distance(p)
    }

    pub fn contains_point(&self, p: Vec3f) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Sphere/box overlap. Touching counts as overlap.
    pub fn intersects_sphere(&self, center: Vec3f, radius: f32) -> bool {
        self.closest_point(center).distance_squared(center) <= radius * radius
    }
}

/// Wraps an angle into (-π, π]. Angles already in range are returned untouched.
pub fn wrap_angle(angle: f32) -> f32 {
    if !angle.is_finite() || (angle > -PI && angle <= PI) {
        return angle;
    }
    PI - (PI - angle).rem_euclid(TAU)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Distance between two points projected on the ground (XZ) plane.
#[inline]
pub fn horizontal_distance(a: Vec3f, b: Vec3f) -> f32 {
    let dx = b.x - a.x;
    let dz = b.z - a.z;
    (dx * dx + dz * dz).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_angle_keeps_half_open_range() {
        assert_eq!(wrap_angle(PI), PI);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-6, "-π should map to +π");
        assert!((wrap_angle(PI + 0.5) - (-PI + 0.5)).abs() < 1e-5);
        assert!((wrap_angle(-PI - 0.5) - (PI - 0.5)).abs() < 1e-5);
        assert!((wrap_angle(5.0 * TAU + 0.25) - 0.25).abs() < 1e-4);
        assert_eq!(wrap_angle(0.3), 0.3);
    }

    #[test]
    fn closest_point_and_sphere_overlap() {
        let b = Aabb::new(Vec3f::new(0.0, 0.0, 0.0), Vec3f::new(2.0, 10.0, 2.0));
        assert_eq!(b.closest_point(Vec3f::new(5.0, 5.0, 1.0)), Vec3f::new(2.0, 5.0, 1.0));
        assert_eq!(b.distance_to_point(Vec3f::new(1.0, 1.0, 1.0)), 0.0);
        assert!(b.intersects_sphere(Vec3f::new(3.5, 5.0, 1.0), 1.5), "touching counts");
        assert!(!b.intersects_sphere(Vec3f::new(3.6, 5.0, 1.0), 1.5));
    }

    #[test]
    fn union_and_translate() {
        let a = Aabb::from_center_half_extents(Vec3f::ZERO, Vec3f::splat(1.0));
        let b = a.translated(Vec3f::new(4.0, 0.0, 0.0));
        let u = a.union(&b);
        assert_eq!(u.min, Vec3f::new(-1.0, -1.0, -1.0));
        assert_eq!(u.max, Vec3f::new(5.0, 1.0, 1.0));
        assert_eq!(u.size(), Vec3f::new(6.0, 2.0, 2.0));
    }
}
