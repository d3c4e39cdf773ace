//! Static obstacle set and axis-separated collision resolution.
//!
//! Every blocker in the world (collidable props, invisible borders, NPCs) is
//! one [`Obstacle`]. The player resolves against obstacle hitboxes. Line of
//! sight is tested against obstacle rects, minus the observer's own.

use hunter_common::{EntityId, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Movement axis for separated collision passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// X axis
    Horizontal,
    /// Y axis
    Vertical,
}

impl Axis {
    /// Component of `v` along this axis.
    #[must_use]
    pub fn component(self, v: Vec2) -> f32 {
        match self {
            Axis::Horizontal => v.x,
            Axis::Vertical => v.y,
        }
    }

    /// `amount` as a vector along this axis.
    #[must_use]
    pub fn along(self, amount: f32) -> Vec2 {
        match self {
            Axis::Horizontal => Vec2::new(amount, 0.0),
            Axis::Vertical => Vec2::new(0.0, amount),
        }
    }
}

/// One blocker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Entity that owns this obstacle, for NPCs
    pub owner: Option<EntityId>,
    /// Visual box, used for sight occlusion
    pub rect: Rect,
    /// Collision box
    pub hitbox: Rect,
}

/// All blockers the player collides against.
#[derive(Debug, Clone, Default)]
pub struct ObstacleSet {
    obstacles: Vec<Obstacle>,
}

impl ObstacleSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a static blocker.
    pub fn push_static(&mut self, rect: Rect, hitbox: Rect) {
        self.obstacles.push(Obstacle {
            owner: None,
            rect,
            hitbox,
        });
    }

    /// Add or refresh the blocker owned by `owner`.
    pub fn upsert_owned(&mut self, owner: EntityId, rect: Rect, hitbox: Rect) {
        if let Some(existing) = self.obstacles.iter_mut().find(|o| o.owner == Some(owner)) {
            existing.rect = rect;
            existing.hitbox = hitbox;
        } else {
            self.obstacles.push(Obstacle {
                owner: Some(owner),
                rect,
                hitbox,
            });
        }
    }

    /// Number of blockers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// Whether there are no blockers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// All blockers, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    /// Collision boxes, in insertion order.
    pub fn hitboxes(&self) -> impl Iterator<Item = &Rect> {
        self.obstacles.iter().map(|o| &o.hitbox)
    }

    /// Visual boxes of every blocker not owned by `observer`.
    pub fn sight_blockers(&self, observer: EntityId) -> impl Iterator<Item = &Rect> {
        self.obstacles
            .iter()
            .filter(move |o| o.owner != Some(observer))
            .map(|o| &o.rect)
    }
}

/// Push `hitbox` out of every obstacle it overlaps along one axis.
///
/// `motion` is the signed displacement just applied on `axis`. Moving
/// positively pins the leading edge to the obstacle's near edge, negatively
/// the reverse. Obstacles are handled independently in order, so with
/// several overlaps the last one wins. Zero motion leaves the box alone.
/// Returns whether any correction was made.
pub fn resolve_axis<'a>(
    hitbox: &mut Rect,
    axis: Axis,
    motion: f32,
    obstacles: impl IntoIterator<Item = &'a Rect>,
) -> bool {
    let mut hit = false;
    for obstacle in obstacles {
        if !obstacle.intersects(hitbox) {
            continue;
        }
        match axis {
            Axis::Horizontal if motion > 0.0 => hitbox.set_right(obstacle.left()),
            Axis::Horizontal if motion < 0.0 => hitbox.set_left(obstacle.right()),
            Axis::Vertical if motion > 0.0 => hitbox.set_bottom(obstacle.top()),
            Axis::Vertical if motion < 0.0 => hitbox.set_top(obstacle.bottom()),
            _ => continue,
        }
        hit = true;
    }
    hit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_horizontal_pins_leading_edge() {
        let wall = [Rect::new(100.0, 0.0, 50.0, 100.0)];
        let mut hitbox = Rect::new(80.0, 10.0, 30.0, 30.0);
        assert!(resolve_axis(&mut hitbox, Axis::Horizontal, 5.0, &wall));
        assert_eq!(hitbox.right(), 100.0);

        let mut hitbox = Rect::new(140.0, 10.0, 30.0, 30.0);
        assert!(resolve_axis(&mut hitbox, Axis::Horizontal, -5.0, &wall));
        assert_eq!(hitbox.left(), 150.0);
    }

    #[test]
    fn test_resolve_vertical_pins_leading_edge() {
        let floor = [Rect::new(0.0, 100.0, 200.0, 20.0)];
        let mut hitbox = Rect::new(10.0, 80.0, 30.0, 30.0);
        assert!(resolve_axis(&mut hitbox, Axis::Vertical, 3.0, &floor));
        assert_eq!(hitbox.bottom(), 100.0);

        let mut hitbox = Rect::new(10.0, 110.0, 30.0, 30.0);
        assert!(resolve_axis(&mut hitbox, Axis::Vertical, -3.0, &floor));
        assert_eq!(hitbox.top(), 120.0);
    }

    #[test]
    fn test_resolve_without_overlap_or_motion() {
        let wall = [Rect::new(100.0, 0.0, 50.0, 100.0)];
        let mut hitbox = Rect::new(0.0, 0.0, 30.0, 30.0);
        assert!(!resolve_axis(&mut hitbox, Axis::Horizontal, 5.0, &wall));

        let mut hitbox = Rect::new(90.0, 10.0, 30.0, 30.0);
        let before = hitbox;
        assert!(!resolve_axis(&mut hitbox, Axis::Horizontal, 0.0, &wall));
        assert_eq!(hitbox, before);
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let wall = [Rect::new(100.0, 0.0, 50.0, 100.0)];
        let mut hitbox = Rect::new(70.0, 0.0, 30.0, 30.0);
        assert!(!resolve_axis(&mut hitbox, Axis::Horizontal, 5.0, &wall));
    }

    #[test]
    fn test_owned_obstacles_refresh_in_place() {
        let mut set = ObstacleSet::new();
        set.push_static(Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(0.0, 0.0, 10.0, 10.0));
        let npc = EntityId::new();
        set.upsert_owned(npc, Rect::new(50.0, 50.0, 20.0, 20.0), Rect::new(55.0, 55.0, 10.0, 10.0));
        set.upsert_owned(npc, Rect::new(60.0, 50.0, 20.0, 20.0), Rect::new(65.0, 55.0, 10.0, 10.0));
        assert_eq!(set.len(), 2);
        assert_eq!(set.hitboxes().nth(1).map(Rect::left), Some(65.0));

        assert_eq!(set.sight_blockers(npc).count(), 1);
        assert_eq!(set.sight_blockers(EntityId::new()).count(), 2);
    }
}
