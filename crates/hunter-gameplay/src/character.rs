//! Non-player characters: look-around, perception and the one-shot approach.
//!
//! An NPC with `look_around` enabled watches for the player. The first time
//! the player is in range and in sight, the NPC blocks the player and after
//! a short delay walks over on one of eight headings. Once it reaches the
//! player it stops for good and asks the world for a dialog. All of this
//! happens at most once per NPC for the lifetime of the loaded world.

use std::sync::Arc;

use hunter_common::{CharacterId, Direction, EntityId, Rect, Vec2};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::GameplayConfig;
use crate::content::{CharacterData, FrameSet};
use crate::entity::{advance_animation, EntityState};
use crate::geometry::{has_line_of_sight, is_within_range, rounded_heading};
use crate::player::Player;
use crate::timer::Timer;

/// Where an NPC is in its perception/approach cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NpcBehavior {
    /// Looking around, has not seen the player
    Idle,
    /// Saw the player, waiting for the notice delay
    Noticing,
    /// Walking towards the player
    Approaching,
    /// Reached the player; terminal
    Stopped,
}

/// Something an NPC update needs the world to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterEvent {
    /// The NPC has just noticed and blocked the player
    NoticedPlayer,
    /// The NPC reached the player and wants to talk
    DialogRequested,
}

/// Serializable perception/approach state of an NPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    /// Whether the NPC has noticed the player
    pub has_noticed: bool,
    /// Whether the NPC has finished its approach
    pub has_moved: bool,
    /// Bounding-box centre
    pub position: Vec2,
    /// Movement intent
    pub intent: Vec2,
    /// Facing direction
    pub facing: Direction,
    /// Whether look-around may still turn the NPC
    pub can_rotate: bool,
    /// Look-around timer
    pub look_timer: Timer,
    /// Notice-delay timer
    pub notice_timer: Timer,
    /// Look-around random source state
    pub rng_state: u64,
}

/// A non-player character.
#[derive(Debug, Clone)]
pub struct Character {
    /// Shared entity state
    entity: EntityState,
    /// Character id in the content tables
    character_id: CharacterId,
    /// Static data
    data: CharacterData,
    /// Set once the player has been noticed
    has_noticed: bool,
    /// Set once the approach has ended
    has_moved: bool,
    /// Whether look-around may turn the NPC
    can_rotate: bool,
    /// Repeating idle look-around
    look_timer: Timer,
    /// One-shot delay before approaching
    notice_timer: Timer,
    /// Hitbox growth used for the arrival check
    approach_margin: f32,
    /// Animation frames per second
    animation_speed: f32,
    /// Source for look-around directions
    rng: fastrand::Rng,
}

impl Character {
    /// Create an NPC centred on `position`. The look-around timer starts at
    /// `now`.
    #[must_use]
    pub fn new(
        character_id: CharacterId,
        data: CharacterData,
        position: Vec2,
        facing: Direction,
        frames: Arc<FrameSet>,
        config: &GameplayConfig,
        now: u64,
    ) -> Self {
        Self {
            entity: EntityState::new(position, facing, frames, config.speed, config.npc_hitbox),
            character_id,
            data,
            has_noticed: false,
            has_moved: false,
            can_rotate: true,
            look_timer: Timer::repeating(config.look_around_ms).started(now),
            notice_timer: Timer::new(config.notice_delay_ms),
            approach_margin: config.approach_margin,
            animation_speed: config.animation_speed,
            rng: fastrand::Rng::new(),
        }
    }

    /// Use a seeded random source for look-around.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    /// Entity ID.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.entity.id()
    }

    /// Character id in the content tables.
    #[must_use]
    pub fn character_id(&self) -> &CharacterId {
        &self.character_id
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

    /// Static data.
    #[must_use]
    pub const fn data(&self) -> &CharacterData {
        &self.data
    }

    /// Lines for the current dialog variant.
    #[must_use]
    pub fn dialog_lines(&self) -> &[String] {
        self.data.current_lines()
    }

    /// Mark the character as beaten (switches the dialog variant).
    pub fn set_defeated(&mut self, defeated: bool) {
        self.data.defeated = defeated;
    }

    /// Whether the NPC has noticed the player.
    #[must_use]
    pub const fn has_noticed(&self) -> bool {
        self.has_noticed
    }

    /// Whether the NPC has finished its approach.
    #[must_use]
    pub const fn has_moved(&self) -> bool {
        self.has_moved
    }

    /// Whether look-around may still turn the NPC.
    #[must_use]
    pub const fn can_rotate(&self) -> bool {
        self.can_rotate
    }

    /// Current behaviour, derived from the flags and the intent.
    #[must_use]
    pub fn behavior(&self) -> NpcBehavior {
        if self.has_moved {
            NpcBehavior::Stopped
        } else if self.has_noticed && self.entity.is_moving() {
            NpcBehavior::Approaching
        } else if self.has_noticed {
            NpcBehavior::Noticing
        } else {
            NpcBehavior::Idle
        }
    }

    /// Per-frame update.
    ///
    /// Ticks both timers, animates, and for NPCs with `look_around` runs
    /// perception and the approach. `sight_blockers` must not contain this
    /// NPC's own rect. At most one event happens per frame.
    pub fn update<'a>(
        &mut self,
        dt: f32,
        now: u64,
        player: &mut Player,
        sight_blockers: impl IntoIterator<Item = &'a Rect>,
    ) -> Option<CharacterEvent> {
        if self.look_timer.update(now) {
            self.look_around();
        }
        if self.notice_timer.update(now) {
            self.start_approach(player.entity().position());
        }

        advance_animation(&mut self.entity, dt, self.animation_speed);

        if !self.data.look_around {
            return None;
        }
        if self.perceive(now, player, sight_blockers) {
            return Some(CharacterEvent::NoticedPlayer);
        }
        if self.approach(dt, player) {
            return Some(CharacterEvent::DialogRequested);
        }
        None
    }

    /// Turn to a random allowed direction while rotation is allowed.
    fn look_around(&mut self) {
        if !self.can_rotate || self.data.directions.is_empty() {
            return;
        }
        let pick = self.rng.usize(..self.data.directions.len());
        self.entity.set_facing(self.data.directions[pick]);
    }

    /// Notice the player if in range and in sight. Fires once per NPC.
    fn perceive<'a>(
        &mut self,
        now: u64,
        player: &mut Player,
        sight_blockers: impl IntoIterator<Item = &'a Rect>,
    ) -> bool {
        if self.has_noticed || self.has_moved {
            return false;
        }
        let own = self.entity.position();
        let target = player.entity().position();
        if !is_within_range(self.data.radius, own, target)
            || !has_line_of_sight(own, target, self.data.radius, sight_blockers)
        {
            return false;
        }

        let player_entity = player.entity_mut();
        player_entity.block();
        player_entity.face_towards(own);
        player.set_noticed(true);
        self.notice_timer.activate(now);
        self.can_rotate = false;
        self.has_noticed = true;
        debug!(character = %self.character_id, "noticed player");
        true
    }

    /// Head for the player on the nearest of eight directions.
    fn start_approach(&mut self, target: Vec2) {
        let heading = rounded_heading(self.entity.position(), target);
        self.entity.set_direction(heading);
        debug!(character = %self.character_id, ?heading, "approaching player");
    }

    /// Walk towards the player until the grown hitbox touches theirs.
    /// Returns `true` on the frame the NPC arrives.
    fn approach(&mut self, dt: f32, player: &mut Player) -> bool {
        if self.has_moved || !self.entity.is_moving() {
            return false;
        }
        let reach = self
            .entity
            .hitbox()
            .inflate(self.approach_margin, self.approach_margin);
        if !reach.intersects(player.entity().hitbox()) {
            let step = self.entity.direction() * self.entity.speed() * dt;
            self.entity.translate(step);
            return false;
        }

        self.entity.set_direction(Vec2::ZERO);
        self.has_moved = true;
        player.set_noticed(false);
        debug!(character = %self.character_id, position = ?self.entity.position(), "reached player");
        true
    }

    /// Capture the perception/approach state.
    #[must_use]
    pub fn snapshot(&self) -> CharacterSnapshot {
        CharacterSnapshot {
            has_noticed: self.has_noticed,
            has_moved: self.has_moved,
            position: self.entity.position(),
            intent: self.entity.direction(),
            facing: self.entity.facing(),
            can_rotate: self.can_rotate,
            look_timer: self.look_timer.clone(),
            notice_timer: self.notice_timer.clone(),
            rng_state: self.rng.get_seed(),
        }
    }

    /// Restore state captured by [`Character::snapshot`].
    pub fn restore(&mut self, snapshot: &CharacterSnapshot) {
        self.has_noticed = snapshot.has_noticed;
        self.has_moved = snapshot.has_moved;
        self.can_rotate = snapshot.can_rotate;
        self.look_timer = snapshot.look_timer.clone();
        self.notice_timer = snapshot.notice_timer.clone();
        self.rng = fastrand::Rng::with_seed(snapshot.rng_state);
        self.entity.set_position(snapshot.position);
        self.entity.set_direction(snapshot.intent);
        self.entity.set_facing(snapshot.facing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{test_frames, DialogLines};

    fn data(radius: f32, look_around: bool, directions: Vec<Direction>) -> CharacterData {
        CharacterData {
            dialog: DialogLines {
                default: vec!["Hey!".into(), "Let's fight".into()],
                defeated: vec!["You win".into()],
            },
            directions,
            radius,
            look_around,
            defeated: false,
        }
    }

    fn npc(radius: f32, look_around: bool) -> Character {
        Character::new(
            CharacterId::new("o1"),
            data(radius, look_around, vec![Direction::Down]),
            Vec2::ZERO,
            Direction::Down,
            test_frames(128, 128, 4),
            &GameplayConfig::default(),
            0,
        )
    }

    fn player_at(x: f32, y: f32) -> Player {
        Player::new(
            Vec2::new(x, y),
            Direction::Down,
            test_frames(128, 128, 4),
            &GameplayConfig::default(),
        )
    }

    const DT: f32 = 0.016;
    const NO_WALLS: [Rect; 0] = [];

    #[test]
    fn test_notice_in_range() {
        let mut npc = npc(100.0, true);
        let mut player = player_at(50.0, 0.0);

        let event = npc.update(DT, 16, &mut player, &NO_WALLS);
        assert_eq!(event, Some(CharacterEvent::NoticedPlayer));
        assert!(player.entity().is_blocked());
        assert!(player.is_noticed());
        assert!(npc.has_noticed());
        assert!(!npc.can_rotate());
        assert_eq!(npc.behavior(), NpcBehavior::Noticing);
        // The player turns towards the NPC.
        assert_eq!(player.entity().facing(), Direction::Left);
    }

    #[test]
    fn test_out_of_range_or_hidden() {
        let mut far = npc(100.0, true);
        let mut player = player_at(150.0, 0.0);
        assert_eq!(far.update(DT, 16, &mut player, &NO_WALLS), None);
        assert!(!player.entity().is_blocked());

        let mut hidden = npc(100.0, true);
        let mut player = player_at(80.0, 0.0);
        let wall = [Rect::new(60.0, -50.0, 5.0, 100.0)];
        assert_eq!(hidden.update(DT, 16, &mut player, &wall), None);
        assert!(!hidden.has_noticed());
    }

    #[test]
    fn test_without_look_around_never_perceives() {
        let mut npc = npc(500.0, false);
        let mut player = player_at(50.0, 0.0);
        for step in 1..100 {
            assert_eq!(npc.update(DT, step * 16, &mut player, &NO_WALLS), None);
        }
        assert!(!player.entity().is_blocked());
        assert_eq!(npc.behavior(), NpcBehavior::Idle);
    }

    #[test]
    fn test_notice_is_idempotent() {
        let mut npc = npc(100.0, true);
        let mut player = player_at(50.0, 0.0);
        npc.update(DT, 16, &mut player, &NO_WALLS);

        player.entity_mut().unblock();
        for now in [100, 200, 300, 400, 500] {
            assert_eq!(npc.update(DT, now, &mut player, &NO_WALLS), None);
        }
        // Not re-blocked, and the notice delay was not restarted.
        assert!(!player.entity().is_blocked());
        assert!(!npc.entity().is_moving());
    }

    #[test]
    fn test_approach_heading_after_notice_delay() {
        let mut npc = npc(400.0, true);
        let mut player = player_at(300.0, 200.0);

        npc.update(DT, 16, &mut player, &NO_WALLS);
        assert!(npc.has_noticed());

        npc.update(DT, 500, &mut player, &NO_WALLS);
        assert!(!npc.entity().is_moving());

        npc.update(DT, 516, &mut player, &NO_WALLS);
        assert_eq!(npc.entity().direction(), Vec2::new(1.0, 1.0));
        assert_eq!(npc.behavior(), NpcBehavior::Approaching);
        // Diagonal approach is not normalized.
        let moved = npc.entity().position();
        assert!((moved.x - 250.0 * DT).abs() < 1e-3);
        assert!((moved.y - 250.0 * DT).abs() < 1e-3);
    }

    #[test]
    fn test_approach_is_one_shot() {
        let mut npc = npc(400.0, true);
        let mut player = player_at(300.0, 200.0);
        let mut events = Vec::new();

        let mut now = 0;
        for _ in 0..100 {
            now += 100;
            events.extend(npc.update(0.1, now, &mut player, &NO_WALLS));
        }

        assert_eq!(
            events,
            vec![
                CharacterEvent::NoticedPlayer,
                CharacterEvent::DialogRequested
            ]
        );
        assert_eq!(npc.behavior(), NpcBehavior::Stopped);
        assert!(npc.has_moved());
        assert!(!player.is_noticed());
        assert!(!npc.entity().is_moving());
        let reach = npc.entity().hitbox().inflate(10.0, 10.0);
        assert!(reach.intersects(player.entity().hitbox()));

        // The player walks away and comes back: nothing happens again.
        let rest = npc.entity().position();
        player.entity_mut().unblock();
        player.entity_mut().set_position(Vec2::new(-200.0, 0.0));
        for _ in 0..20 {
            now += 100;
            assert_eq!(npc.update(0.1, now, &mut player, &NO_WALLS), None);
        }
        assert!(!player.entity().is_blocked());
        assert_eq!(npc.entity().position(), rest);
    }

    #[test]
    fn test_look_around_until_noticed() {
        let mut npc = Character::new(
            CharacterId::new("o2"),
            data(100.0, true, vec![Direction::Left]),
            Vec2::ZERO,
            Direction::Down,
            test_frames(128, 128, 4),
            &GameplayConfig::default(),
            0,
        )
        .with_seed(7);
        let mut player = player_at(1000.0, 0.0);

        npc.update(DT, 1499, &mut player, &NO_WALLS);
        assert_eq!(npc.entity().facing(), Direction::Down);
        npc.update(DT, 1500, &mut player, &NO_WALLS);
        assert_eq!(npc.entity().facing(), Direction::Left);

        // Once the player is noticed the NPC stops turning.
        let mut npc = Character::new(
            CharacterId::new("o3"),
            data(100.0, true, vec![Direction::Up]),
            Vec2::ZERO,
            Direction::Down,
            test_frames(128, 128, 4),
            &GameplayConfig::default(),
            0,
        );
        let mut near = player_at(0.0, 60.0);
        npc.update(DT, 16, &mut near, &NO_WALLS);
        npc.update(DT, 1500, &mut near, &NO_WALLS);
        assert_ne!(npc.entity().facing(), Direction::Up);
    }

    #[test]
    fn test_dialog_variant() {
        let mut npc = npc(100.0, true);
        assert_eq!(npc.dialog_lines().len(), 2);
        npc.set_defeated(true);
        assert_eq!(npc.dialog_lines(), ["You win".to_string()]);
    }

    #[test]
    fn test_snapshot_resume_matches_uninterrupted() {
        let mut original = npc(400.0, true);
        let mut player = player_at(300.0, 200.0);
        original.update(0.1, 100, &mut player, &NO_WALLS);
        original.update(0.1, 700, &mut player, &NO_WALLS);
        assert_eq!(original.behavior(), NpcBehavior::Approaching);

        let json = serde_json::to_string(&original.snapshot()).expect("serialize");
        let snapshot: CharacterSnapshot = serde_json::from_str(&json).expect("deserialize");

        let mut resumed = npc(400.0, true);
        resumed.restore(&snapshot);
        let mut resumed_player = player.clone();
        assert_eq!(resumed.snapshot(), original.snapshot());

        let mut now = 700;
        for _ in 0..40 {
            now += 100;
            let a = original.update(0.1, now, &mut player, &NO_WALLS);
            let b = resumed.update(0.1, now, &mut resumed_player, &NO_WALLS);
            assert_eq!(a, b);
            assert_eq!(original.entity().position(), resumed.entity().position());
            assert_eq!(original.entity().facing(), resumed.entity().facing());
            assert_eq!(original.behavior(), resumed.behavior());
        }
        assert_eq!(resumed.behavior(), NpcBehavior::Stopped);
        assert_eq!(player.is_noticed(), resumed_player.is_noticed());
    }

    #[test]
    fn test_snapshot_resumes_look_around_sequence() {
        let looker = || {
            Character::new(
                CharacterId::new("o1"),
                data(
                    100.0,
                    true,
                    vec![Direction::Down, Direction::Right, Direction::Left, Direction::Up],
                ),
                Vec2::ZERO,
                Direction::Down,
                test_frames(128, 128, 4),
                &GameplayConfig::default(),
                0,
            )
            .with_seed(42)
        };
        let mut original = looker();
        let mut player = player_at(1000.0, 0.0);
        let mut now = 0;
        for _ in 0..5 {
            now += 1500;
            original.update(DT, now, &mut player, &NO_WALLS);
        }

        let mut resumed = looker();
        resumed.restore(&original.snapshot());
        assert_eq!(resumed.snapshot(), original.snapshot());

        let mut expected = Vec::new();
        let mut actual = Vec::new();
        for _ in 0..20 {
            now += 1500;
            original.update(DT, now, &mut player, &NO_WALLS);
            resumed.update(DT, now, &mut player, &NO_WALLS);
            expected.push(original.entity().facing());
            actual.push(resumed.entity().facing());
        }
        assert_eq!(actual, expected);
    }
}
