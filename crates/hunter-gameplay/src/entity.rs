//! Shared entity state for the player and NPCs.
//!
//! Both [`Player`](crate::player::Player) and
//! [`Character`](crate::character::Character) compose an [`EntityState`]. Only
//! the animation and facing logic is common to both, so it lives here as
//! methods plus the [`advance_animation`] free function.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use hunter_common::{ContentError, Direction, EntityId, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::content::{Frame, FrameSet};
use crate::render::{RenderItem, WorldLayer};

/// Below this vertical offset, [`EntityState::face_towards`] picks a
/// horizontal facing.
pub const FACING_TOLERANCE: f32 = 30.0;

/// Animation state: a facing direction, moving or idle.
///
/// The string key is `"{direction}"` while moving and `"{direction}_idle"`
/// otherwise, matching the frame-set keys in content files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationState {
    /// Facing direction
    pub direction: Direction,
    /// Whether the entity is moving
    pub moving: bool,
}

impl AnimationState {
    /// Number of distinct animation states.
    pub const COUNT: usize = 8;

    /// Idle state facing `direction`.
    #[must_use]
    pub const fn idle(direction: Direction) -> Self {
        Self {
            direction,
            moving: false,
        }
    }

    /// Moving state facing `direction`.
    #[must_use]
    pub const fn moving(direction: Direction) -> Self {
        Self {
            direction,
            moving: true,
        }
    }

    /// All states, in [`AnimationState::index`] order.
    pub fn all() -> impl Iterator<Item = AnimationState> {
        Direction::ALL
            .into_iter()
            .flat_map(|dir| [Self::moving(dir), Self::idle(dir)])
    }

    /// Dense index in `0..COUNT`.
    #[must_use]
    pub const fn index(self) -> usize {
        self.direction.index() * 2 + if self.moving { 0 } else { 1 }
    }

    /// Content key, e.g. `"left"` or `"left_idle"`.
    #[must_use]
    pub fn key(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for AnimationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.moving {
            write!(f, "{}", self.direction)
        } else {
            write!(f, "{}_idle", self.direction)
        }
    }
}

impl FromStr for AnimationState {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (dir, moving) = match s.strip_suffix("_idle") {
            Some(dir) => (dir, false),
            None => (s, true),
        };
        let direction = dir
            .parse::<Direction>()
            .map_err(|_| ContentError::UnknownAnimationState(s.to_string()))?;
        Ok(Self { direction, moving })
    }
}

/// How far the collision hitbox is inset from the visual bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitboxInset {
    /// Fraction of the bounding-box width removed (0.5 = half as wide)
    pub width_factor: f32,
    /// Absolute height removed, in world units
    pub height: f32,
}

impl HitboxInset {
    /// Creates an inset.
    #[must_use]
    pub const fn new(width_factor: f32, height: f32) -> Self {
        Self {
            width_factor,
            height,
        }
    }

    /// Applies the inset to a bounding box, keeping the centre. The result
    /// never grows past the bounding box.
    #[must_use]
    pub fn apply(&self, rect: &Rect) -> Rect {
        let dw = (rect.width * self.width_factor).clamp(0.0, rect.width);
        let dh = self.height.clamp(0.0, rect.height);
        rect.inflate(-dw, -dh)
    }
}

impl Default for HitboxInset {
    fn default() -> Self {
        Self::new(0.5, 60.0)
    }
}

/// Movable, animated entity state.
#[derive(Debug, Clone)]
pub struct EntityState {
    /// Unique entity ID
    id: EntityId,
    /// Visual bounding box; its centre is the entity position
    rect: Rect,
    /// Collision box, always centred on `rect`
    hitbox: Rect,
    /// Direction the entity is facing
    facing: Direction,
    /// Movement intent (unit length or zero)
    direction: Vec2,
    /// Speed in world units per second
    speed: f32,
    /// Whether movement is suppressed
    blocked: bool,
    /// Current animation state
    state: AnimationState,
    /// Fractional frame counter
    frame_index: f32,
    /// Frames for every animation state
    frames: Arc<FrameSet>,
    /// Render layer
    layer: WorldLayer,
}

impl EntityState {
    /// Create an idle entity centred on `position`.
    ///
    /// The bounding box takes the size of the first idle frame for `facing`.
    #[must_use]
    pub fn new(
        position: Vec2,
        facing: Direction,
        frames: Arc<FrameSet>,
        speed: f32,
        inset: HitboxInset,
    ) -> Self {
        let state = AnimationState::idle(facing);
        let size = frames.first(state).size();
        let rect = Rect::from_center(position, size);
        Self {
            id: EntityId::new(),
            rect,
            hitbox: inset.apply(&rect),
            facing,
            direction: Vec2::ZERO,
            speed,
            blocked: false,
            state,
            frame_index: 0.0,
            frames,
            layer: WorldLayer::Main,
        }
    }

    /// Entity ID.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Centre of the bounding box.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.rect.center()
    }

    /// Move the entity so its bounding box is centred on `position`.
    pub fn set_position(&mut self, position: Vec2) {
        self.rect.set_center(position);
        self.hitbox.set_center(position);
    }

    /// Visual bounding box.
    #[must_use]
    pub const fn rect(&self) -> &Rect {
        &self.rect
    }

    /// Collision box.
    #[must_use]
    pub const fn hitbox(&self) -> &Rect {
        &self.hitbox
    }

    /// Mutable collision box. Call [`EntityState::sync_rect_to_hitbox`] after
    /// moving it.
    pub fn hitbox_mut(&mut self) -> &mut Rect {
        &mut self.hitbox
    }

    /// Translate both boxes by `offset`.
    pub fn translate(&mut self, offset: Vec2) {
        let center = self.rect.center() + offset;
        self.set_position(center);
    }

    /// Re-centre the bounding box on the hitbox after collision correction.
    pub fn sync_rect_to_hitbox(&mut self) {
        self.rect.set_center(self.hitbox.center());
    }

    /// Direction the entity is facing.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Set the facing direction.
    pub fn set_facing(&mut self, facing: Direction) {
        self.facing = facing;
    }

    /// Movement intent.
    #[must_use]
    pub const fn direction(&self) -> Vec2 {
        self.direction
    }

    /// Set the movement intent. Ignored while blocked.
    pub fn set_direction(&mut self, direction: Vec2) {
        if !self.blocked {
            self.direction = direction;
        }
    }

    /// Whether the entity has a non-zero movement intent.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.direction != Vec2::ZERO
    }

    /// Speed in world units per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Whether movement is suppressed.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        self.blocked
    }

    /// Suppress movement and drop the current intent.
    pub fn block(&mut self) {
        self.blocked = true;
        self.direction = Vec2::ZERO;
    }

    /// Allow movement again. The previous intent is not restored.
    pub fn unblock(&mut self) {
        self.blocked = false;
    }

    /// Current animation state.
    #[must_use]
    pub const fn state(&self) -> AnimationState {
        self.state
    }

    /// Render layer.
    #[must_use]
    pub const fn layer(&self) -> WorldLayer {
        self.layer
    }

    /// Depth-sort key (bounding-box centre y).
    #[must_use]
    pub fn depth_key(&self) -> f32 {
        self.rect.center_y()
    }

    /// Fractional frame counter.
    #[must_use]
    pub const fn frame_index(&self) -> f32 {
        self.frame_index
    }

    /// Reset the frame counter.
    pub fn reset_animation(&mut self) {
        self.frame_index = 0.0;
    }

    /// Frame currently shown.
    #[must_use]
    pub fn frame(&self) -> &Frame {
        self.frames.frame_at(self.state, self.frame_index)
    }

    /// Render item for the current frame, shadow included.
    #[must_use]
    pub fn render_item(&self) -> RenderItem<'_> {
        RenderItem {
            image: self.frame(),
            rect: self.rect,
            depth_key: self.depth_key(),
            layer: self.layer,
            casts_shadow: true,
        }
    }

    /// Advance the frame counter by `animation_speed * dt`.
    pub fn animate(&mut self, dt: f32, animation_speed: f32) {
        self.frame_index += animation_speed * dt;
    }

    /// Derive facing and animation state from the movement intent.
    ///
    /// Horizontal intent wins: facing follows `x` whenever it is non-zero
    /// and falls back to `y` only when `x` is zero. With no intent the last
    /// facing is kept and the state becomes idle.
    pub fn derive_state(&mut self) {
        let moving = self.is_moving();
        if moving {
            if self.direction.x != 0.0 {
                self.facing = if self.direction.x > 0.0 {
                    Direction::Right
                } else {
                    Direction::Left
                };
            } else if self.direction.y != 0.0 {
                self.facing = if self.direction.y > 0.0 {
                    Direction::Down
                } else {
                    Direction::Up
                };
            }
        }
        self.state = AnimationState {
            direction: self.facing,
            moving,
        };
    }

    /// Turn to face `target`.
    ///
    /// Vertical wins here: the facing is horizontal only when the vertical
    /// offset is under [`FACING_TOLERANCE`]. This is the opposite tie-break to
    /// [`EntityState::derive_state`] and both are kept as they are.
    pub fn face_towards(&mut self, target: Vec2) {
        let relation = target - self.position();
        self.facing = if relation.y.abs() < FACING_TOLERANCE {
            if relation.x > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if relation.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };
    }
}

/// Per-frame animation step shared by every entity kind.
pub fn advance_animation(entity: &mut EntityState, dt: f32, animation_speed: f32) {
    entity.derive_state();
    entity.animate(dt, animation_speed);
}
