//! Player controller: input polling and axis-separated movement.

use std::sync::Arc;

use hunter_common::{Direction, Vec2};
use tracing::trace;

use crate::collision::{resolve_axis, Axis, ObstacleSet};
use crate::config::GameplayConfig;
use crate::content::FrameSet;
use crate::entity::{advance_animation, EntityState};
use crate::input::{movement_vector, InputSource};

/// The player entity.
#[derive(Debug, Clone)]
pub struct Player {
    /// Shared entity state
    entity: EntityState,
    /// Set while an NPC has just noticed the player
    noticed: bool,
}

impl Player {
    /// Create the player centred on `position`.
    #[must_use]
    pub fn new(
        position: Vec2,
        facing: Direction,
        frames: Arc<FrameSet>,
        config: &GameplayConfig,
    ) -> Self {
        Self {
            entity: EntityState::new(position, facing, frames, config.speed, config.player_hitbox),
            noticed: false,
        }
    }

    /// Shared entity state.
    #[must_use]
    pub const fn entity(&self) -> &EntityState {
        &self.entity
    }

    /// Mutable entity state.
    pub fn entity_mut(&mut self) -> &mut EntityState {
        &mut self.entity
    }

    /// Whether an NPC has just noticed the player.
    #[must_use]
    pub const fn is_noticed(&self) -> bool {
        self.noticed
    }

    /// Set the noticed flag.
    pub fn set_noticed(&mut self, noticed: bool) {
        self.noticed = noticed;
    }

    /// Read the directional keys into the movement intent. Skipped while
    /// blocked.
    pub fn poll_input(&mut self, input: &impl InputSource) {
        if self.entity.is_blocked() {
            return;
        }
        self.entity.set_direction(movement_vector(input));
    }

    /// Move by the current intent, horizontal pass first, then vertical.
    pub fn move_and_collide(&mut self, dt: f32, obstacles: &ObstacleSet) {
        let step = self.entity.direction() * self.entity.speed() * dt;
        for axis in [Axis::Horizontal, Axis::Vertical] {
            self.entity.translate(axis.along(axis.component(step)));
            self.resolve_collisions(axis, obstacles);
        }
    }

    /// Push the hitbox out of every overlapping obstacle along `axis`, then
    /// re-centre the bounding box on it.
    pub fn resolve_collisions(&mut self, axis: Axis, obstacles: &ObstacleSet) {
        let heading = axis.component(self.entity.direction());
        if resolve_axis(self.entity.hitbox_mut(), axis, heading, obstacles.hitboxes()) {
            trace!(?axis, position = ?self.entity.hitbox().center(), "player collision");
        }
        self.entity.sync_rect_to_hitbox();
    }

    /// Per-frame update: input and movement unless blocked, then animation.
    pub fn update(
        &mut self,
        dt: f32,
        input: &impl InputSource,
        obstacles: &ObstacleSet,
        animation_speed: f32,
    ) {
        if !self.entity.is_blocked() {
            self.poll_input(input);
            self.move_and_collide(dt, obstacles);
        }
        advance_animation(&mut self.entity, dt, animation_speed);
    }
}
