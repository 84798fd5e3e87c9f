//! Small 2-D vector helpers on top of [`glam::Vec2`].
//!
//! glam already covers add/sub/scale/dot; what lives here are the few
//! closed-form operations the caster and camera lean on.

use glam::{Vec2, vec2};

/// Determinant of the 2×2 matrix whose columns are `a` and `b`.
#[inline(always)]
pub fn det(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Rotate `v` counter-clockwise by `angle` radians.
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    vec2(v.x * c - v.y * s, v.x * s + v.y * c)
}

/// Fractional part of each component, always in `[0, 1)`.
#[inline(always)]
pub fn wrap01(v: Vec2) -> Vec2 {
    v - v.floor()
}

/// Grid cell containing `p`. Negative coordinates map to negative cells.
#[inline(always)]
pub fn cell_of(p: Vec2) -> (i32, i32) {
    (p.x.floor() as i32, p.y.floor() as i32)
}

/// Solve `p = plane * t.x + dir * t.y` for `t` (inverse of the camera basis).
///
/// Returns `None` when `plane` and `dir` are parallel.
#[inline]
pub fn to_basis(p: Vec2, plane: Vec2, dir: Vec2) -> Option<Vec2> {
    let d = det(plane, dir);
    if d == 0.0 || !d.is_finite() {
        return None;
    }
    let inv = 1.0 / d;
    Some(vec2(inv * det(p, dir), inv * det(plane, p)))
}
