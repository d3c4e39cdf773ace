//! Gameplay tuning values.

use hunter_common::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::HitboxInset;

/// Tuning values shared by the world, its entities and the render group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    // === Movement ===
    /// Entity speed in world units per second
    pub speed: f32,
    /// Animation frames per second
    pub animation_speed: f32,
    /// Player hitbox inset
    pub player_hitbox: HitboxInset,
    /// NPC hitbox inset
    pub npc_hitbox: HitboxInset,

    // === NPC behaviour ===
    /// Radius within which the player may start a conversation
    pub interaction_radius: f32,
    /// Delay between an NPC noticing the player and walking over (ms)
    pub notice_delay_ms: u64,
    /// Period of the idle look-around (ms)
    pub look_around_ms: u64,
    /// Margin around an approaching NPC's hitbox that counts as "arrived"
    pub approach_margin: f32,

    // === Dialog ===
    /// Minimum time a dialog line stays up (ms)
    pub dialog_delay_ms: u64,

    // === Presentation ===
    /// Window width in pixels
    pub window_width: u32,
    /// Window height in pixels
    pub window_height: u32,
    /// Entity shadow offset from the top-left corner
    pub shadow_offset: Vec2,
    /// Map tile size in pixels
    pub tile_size: u32,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            speed: 250.0,
            animation_speed: 6.0,
            player_hitbox: HitboxInset::new(0.6, 75.0),
            npc_hitbox: HitboxInset::new(0.5, 60.0),

            interaction_radius: 100.0,
            notice_delay_ms: 500,
            look_around_ms: 1500,
            approach_margin: 10.0,

            dialog_delay_ms: 500,

            window_width: 1280,
            window_height: 720,
            shadow_offset: Vec2::new(40.0, 110.0),
            tile_size: 64,
        }
    }
}

impl GameplayConfig {
    /// Window size as a vector.
    #[must_use]
    pub fn window_size(&self) -> Vec2 {
        Vec2::new(self.window_width as f32, self.window_height as f32)
    }

    /// Clamp values to sane ranges.
    pub fn validate(&mut self) {
        self.speed = self.speed.max(0.0);
        self.animation_speed = self.animation_speed.max(0.0);
        self.interaction_radius = self.interaction_radius.max(0.0);
        self.approach_margin = self.approach_margin.max(0.0);
        self.window_width = self.window_width.max(320);
        self.window_height = self.window_height.max(240);
        self.tile_size = self.tile_size.max(1);
        for inset in [&mut self.player_hitbox, &mut self.npc_hitbox] {
            inset.width_factor = inset.width_factor.clamp(0.0, 1.0);
            inset.height = inset.height.max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameplayConfig::default();
        assert_eq!(config.speed, 250.0);
        assert_eq!(config.notice_delay_ms, 500);
        assert_eq!(config.look_around_ms, 1500);
        assert_eq!(config.window_size(), Vec2::new(1280.0, 720.0));
    }

    #[test]
    fn test_validate_clamps() {
        let mut config = GameplayConfig {
            speed: -5.0,
            window_width: 10,
            player_hitbox: HitboxInset::new(1.5, -3.0),
            ..Default::default()
        };
        config.validate();
        assert_eq!(config.speed, 0.0);
        assert_eq!(config.window_width, 320);
        assert_eq!(config.player_hitbox, HitboxInset::new(1.0, 0.0));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GameplayConfig =
            serde_json::from_str(r#"{ "speed": 100.0 }"#).expect("valid config");
        assert_eq!(config.speed, 100.0);
        assert_eq!(config.dialog_delay_ms, 500);
    }
}
