//! Planar math: vectors, axis-aligned rectangles and facing directions.
//!
//! World space is y-down: `top < bottom`, and "up" is negative y.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ContentError;

pub use glam::Vec2;

/// Axis-aligned rectangle in world space (top-left origin, floating point).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle of the given size centred on `center`.
    #[must_use]
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self::new(
            center.x - size.x / 2.0,
            center.y - size.y / 2.0,
            size.x,
            size.y,
        )
    }

    /// Creates a rectangle of the given size with its top-left at `topleft`.
    #[must_use]
    pub fn from_topleft(topleft: Vec2, size: Vec2) -> Self {
        Self::new(topleft.x, topleft.y, size.x, size.y)
    }

    /// Left edge.
    #[must_use]
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Size as a vector.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x(), self.center_y())
    }

    /// Horizontal centre.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Vertical centre.
    #[must_use]
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Top-left corner.
    #[must_use]
    pub fn topleft(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Midpoint of the top edge.
    #[must_use]
    pub fn midtop(&self) -> Vec2 {
        Vec2::new(self.center_x(), self.top())
    }

    /// Midpoint of the bottom edge.
    #[must_use]
    pub fn midbottom(&self) -> Vec2 {
        Vec2::new(self.center_x(), self.bottom())
    }

    /// Moves the rectangle so that its left edge is at `left`.
    pub fn set_left(&mut self, left: f32) {
        self.x = left;
    }

    /// Moves the rectangle so that its right edge is at `right`.
    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.width;
    }

    /// Moves the rectangle so that its top edge is at `top`.
    pub fn set_top(&mut self, top: f32) {
        self.y = top;
    }

    /// Moves the rectangle so that its bottom edge is at `bottom`.
    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.height;
    }

    /// Moves the rectangle so that its centre is at `center`.
    pub fn set_center(&mut self, center: Vec2) {
        self.set_center_x(center.x);
        self.set_center_y(center.y);
    }

    /// Moves the rectangle horizontally so that its centre x is `cx`.
    pub fn set_center_x(&mut self, cx: f32) {
        self.x = cx - self.width / 2.0;
    }

    /// Moves the rectangle vertically so that its centre y is `cy`.
    pub fn set_center_y(&mut self, cy: f32) {
        self.y = cy - self.height / 2.0;
    }

    /// Returns a copy grown by `dx` in width and `dy` in height, keeping the
    /// centre. Negative values shrink.
    #[must_use]
    pub fn inflate(&self, dx: f32, dy: f32) -> Self {
        Self::new(
            self.x - dx / 2.0,
            self.y - dy / 2.0,
            self.width + dx,
            self.height + dy,
        )
    }

    /// Returns a copy moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// Checks if this rectangle overlaps another. Touching edges do not count.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Checks if a point lies inside (left/top inclusive, right/bottom exclusive).
    #[must_use]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Checks if `other` lies fully inside this rectangle.
    #[must_use]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// Clips the segment `a -> b` against this rectangle (Liang-Barsky).
    ///
    /// Returns the part of the segment inside the rectangle, or `None` when
    /// the segment misses it. Edges are inclusive, so a segment that only
    /// touches a corner clips to a single point.
    #[must_use]
    pub fn clip_line(&self, a: Vec2, b: Vec2) -> Option<(Vec2, Vec2)> {
        let d = b - a;
        let mut t0 = 0.0_f32;
        let mut t1 = 1.0_f32;

        let edges = [
            (-d.x, a.x - self.left()),
            (d.x, self.right() - a.x),
            (-d.y, a.y - self.top()),
            (d.y, self.bottom() - a.y),
        ];

        for (p, q) in edges {
            if p == 0.0 {
                // Parallel to this edge: reject when outside of it.
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }

        Some((a + d * t0, a + d * t1))
    }

    /// Checks if the segment `a -> b` crosses this rectangle.
    #[must_use]
    pub fn intersects_segment(&self, a: Vec2, b: Vec2) -> bool {
        self.clip_line(a, b).is_some()
    }
}

/// Facing direction of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Facing up (negative y)
    Up,
    /// Facing down (default)
    #[default]
    Down,
    /// Facing left
    Left,
    /// Facing right
    Right,
}

impl Direction {
    /// All four directions in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Convert direction to a unit vector.
    #[must_use]
    pub fn to_vec2(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }

    /// Lowercase key used in content files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Position in [`Direction::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            other => Err(ContentError::UnknownDirection(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rect_edges_and_center() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.left(), 10.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.bottom(), 60.0);
        assert_eq!(rect.center(), Vec2::new(25.0, 40.0));
        assert_eq!(rect.midtop(), Vec2::new(25.0, 20.0));
        assert_eq!(rect.midbottom(), Vec2::new(25.0, 60.0));
    }

    #[test]
    fn test_rect_inflate_keeps_center() {
        let rect = Rect::from_center(Vec2::new(100.0, 100.0), Vec2::new(128.0, 128.0));
        let hitbox = rect.inflate(-64.0, -60.0);
        assert_eq!(hitbox.center(), rect.center());
        assert_eq!(hitbox.width, 64.0);
        assert_eq!(hitbox.height, 68.0);
        assert!(rect.contains_rect(&hitbox));
    }

    #[test]
    fn test_rect_setters() {
        let mut rect = Rect::new(0.0, 0.0, 10.0, 20.0);
        rect.set_right(50.0);
        assert_eq!(rect.left(), 40.0);
        rect.set_bottom(100.0);
        assert_eq!(rect.top(), 80.0);
        rect.set_center(Vec2::ZERO);
        assert_eq!(rect.topleft(), Vec2::new(-5.0, -10.0));
    }

    #[test]
    fn test_rect_intersects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        // Touching edges do not overlap
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(20.0, 20.0, 5.0, 5.0)));
    }

    #[test]
    fn test_clip_line_through_rect() {
        let rect = Rect::new(10.0, -5.0, 10.0, 10.0);
        let clipped = rect
            .clip_line(Vec2::new(0.0, 0.0), Vec2::new(30.0, 0.0))
            .expect("segment crosses the rect");
        assert!(clipped.0.abs_diff_eq(Vec2::new(10.0, 0.0), 1e-4));
        assert!(clipped.1.abs_diff_eq(Vec2::new(20.0, 0.0), 1e-4));
    }

    #[test]
    fn test_clip_line_misses_rect() {
        let rect = Rect::new(10.0, 10.0, 10.0, 10.0);
        assert!(rect
            .clip_line(Vec2::new(0.0, 0.0), Vec2::new(30.0, 0.0))
            .is_none());
        // Stops short of the rect
        assert!(!rect.intersects_segment(Vec2::new(0.0, 15.0), Vec2::new(5.0, 15.0)));
    }

    #[test]
    fn test_clip_line_inside_rect() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let (a, b) = rect
            .clip_line(Vec2::new(10.0, 10.0), Vec2::new(20.0, 30.0))
            .expect("segment is inside");
        assert_eq!(a, Vec2::new(10.0, 10.0));
        assert_eq!(b, Vec2::new(20.0, 30.0));
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("left".parse::<Direction>(), Ok(Direction::Left));
        assert_eq!(
            "north".parse::<Direction>(),
            Err(ContentError::UnknownDirection("north".to_string()))
        );
        for dir in Direction::ALL {
            assert_eq!(dir.as_str().parse::<Direction>(), Ok(dir));
            assert_eq!(Direction::ALL[dir.index()], dir);
        }
    }

    #[test]
    fn test_direction_to_vec2() {
        assert_eq!(Direction::Up.to_vec2(), Vec2::new(0.0, -1.0));
        assert_eq!(Direction::Right.to_vec2(), Vec2::new(1.0, 0.0));
    }

    proptest! {
        #[test]
        fn prop_inflate_shrink_is_contained(
            x in -500.0f32..500.0,
            y in -500.0f32..500.0,
            w in 1.0f32..300.0,
            h in 1.0f32..300.0,
            shrink in 0.0f32..0.9,
        ) {
            let rect = Rect::new(x, y, w, h);
            let inner = rect.inflate(-w * shrink, -h * shrink);
            prop_assert!((inner.center() - rect.center()).length() < 1e-3);
            prop_assert!(inner.width <= rect.width && inner.height <= rect.height);
        }
    }
}
