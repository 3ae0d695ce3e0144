//! Circle collision
//!
//! Every collider is a circle whose configured size is its diameter. Two
//! colliders touch when their centers are no farther apart than the half-sum
//! of their sizes; exact contact counts as a hit.

use glam::Vec2;

/// True when the two circles do not touch
#[inline]
pub fn separated(a: Vec2, b: Vec2, size_a: f32, size_b: f32) -> bool {
    a.distance(b) > size_a / 2.0 + size_b / 2.0
}

/// True when the two circles touch or overlap
#[inline]
pub fn overlapping(a: Vec2, b: Vec2, size_a: f32, size_b: f32) -> bool {
    !separated(a, b, size_a, size_b)
}
