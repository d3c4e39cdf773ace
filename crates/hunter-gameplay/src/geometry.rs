//! Proximity and line-of-sight queries.
//!
//! Both queries work on entity reference points (rect centres). Occlusion is a
//! segment-vs-rectangle clip test: an obstacle blocks sight when any part of
//! the straight segment between the two points passes through it.

use hunter_common::{Rect, Vec2};

/// Checks if `b` lies within `radius` of `a` (inclusive).
#[inline]
#[must_use]
pub fn is_within_range(radius: f32, a: Vec2, b: Vec2) -> bool {
    a.distance(b) <= radius
}

/// Checks if any obstacle crosses the segment `from -> to`.
#[must_use]
pub fn is_occluded<'a>(from: Vec2, to: Vec2, obstacles: impl IntoIterator<Item = &'a Rect>) -> bool {
    obstacles
        .into_iter()
        .any(|rect| rect.intersects_segment(from, to))
}

/// Checks if an observer at `observer` with perception `radius` can see
/// `target`.
///
/// The target must be strictly closer than `radius` and no obstacle may cross
/// the sight line. The caller leaves the observer's own rect out of
/// `obstacles`. With no obstacles this reduces to the distance check.
#[must_use]
pub fn has_line_of_sight<'a>(
    observer: Vec2,
    target: Vec2,
    radius: f32,
    obstacles: impl IntoIterator<Item = &'a Rect>,
) -> bool {
    observer.distance(target) < radius && !is_occluded(observer, target, obstacles)
}

/// Unit vector from `from` towards `to`, with each axis rounded to -1, 0 or 1.
///
/// This yields one of eight headings. Coincident points give zero.
#[must_use]
pub fn rounded_heading(from: Vec2, to: Vec2) -> Vec2 {
    let dir = (to - from).normalize_or_zero();
    Vec2::new(dir.x.round(), dir.y.round())
}
