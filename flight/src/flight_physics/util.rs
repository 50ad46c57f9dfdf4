use crate::Vec3f;

#[inline]
pub(super) fn horizontal_len(v: Vec3f) -> f32 {
    (v.x * v.x + v.z * v.z).sqrt()
}

/// Rescales the XZ part of `v` so its length is at most `max`. Returns true
/// when it had to.
#[inline]
pub(super) fn clamp_horizontal(v: &mut Vec3f, max: f32) -> bool {
    let len = horizontal_len(*v);
    if len <= max || len <= 0.0 {
        return false;
    }
    let scale = max.max(0.0) / len;
    v.x *= scale;
    v.z *= scale;
    true
}

// Heading basis on the ground plane: heading 0 faces +Z, heading π/2 faces +X.
#[inline]
pub(super) fn forward_of(heading: f32) -> Vec3f {
    let (s, c) = heading.sin_cos();
    Vec3f::new(s, 0.0, c)
}

#[inline]
pub(super) fn right_of(heading: f32) -> Vec3f {
    let (s, c) = heading.sin_cos();
    Vec3f::new(c, 0.0, -s)
}
