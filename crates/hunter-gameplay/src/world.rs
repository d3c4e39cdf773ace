//! The world controller: owns every entity, the obstacle set, the clock and
//! the single active dialog session, and runs one frame at a time.
//!
//! Frame order is fixed: interaction, player, characters (in placement
//! order), static sprites, then the dialog session. The player moves before
//! the characters look, so perception always sees this frame's player
//! position.

use hunter_common::{
    CharacterId, ContentError, ContentResult, Direction, EntityId, Rect, Vec2,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::character::{Character, CharacterEvent, CharacterSnapshot};
use crate::collision::ObstacleSet;
use crate::config::GameplayConfig;
use crate::content::{AssetProvider, Frame};
use crate::dialog::{DialogError, DialogEvent, DialogResult, DialogSession};
use crate::events::{EventBus, GameEvent};
use crate::geometry::is_within_range;
use crate::input::{InputSource, Key};
use crate::player::Player;
use crate::render::{RenderGroup, RenderSink, WorldLayer};
use crate::sprites::{SpriteKind, StaticSprite};

/// Key of the looping water animation.
pub const WATER_ANIMATION: &str = "water";

/// A plain image placed by its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePlacement {
    /// Top-left corner
    pub pos: Vec2,
    /// Image
    pub image: Frame,
}

/// A map object: a prop, or a decoration drawn above entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectPlacement {
    /// Top-left corner
    pub pos: Vec2,
    /// Image
    pub image: Frame,
    /// Drawn above entities without collision
    #[serde(default)]
    pub top: bool,
}

/// Tall grass where monsters live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchPlacement {
    /// Top-left corner
    pub pos: Vec2,
    /// Image
    pub image: Frame,
    /// Biome name
    pub biome: String,
}

/// An animated coast tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoastPlacement {
    /// Top-left corner
    pub pos: Vec2,
    /// Animation key, e.g. `"grass_left"`
    pub animation: String,
}

/// A player start or an NPC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityPlacement {
    /// Possible player spawn point
    Player {
        /// Centre position
        pos: Vec2,
        /// Initial facing
        direction: Direction,
        /// Spawn key, e.g. `"house"`
        start: String,
    },
    /// Non-player character
    Character {
        /// Centre position
        pos: Vec2,
        /// Initial facing
        direction: Direction,
        /// Graphic key of the frame set
        graphic: String,
        /// Key into the character table
        character_id: CharacterId,
    },
}

/// A parsed map, as handed over by the map loader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapData {
    /// Ground tiles
    #[serde(default)]
    pub terrain: Vec<ImagePlacement>,
    /// Props and top decorations
    #[serde(default)]
    pub objects: Vec<ObjectPlacement>,
    /// Invisible collision areas
    #[serde(default)]
    pub borders: Vec<Rect>,
    /// Monster patches
    #[serde(default)]
    pub monster_patches: Vec<PatchPlacement>,
    /// Areas filled with water tiles
    #[serde(default)]
    pub water: Vec<Rect>,
    /// Coast tiles
    #[serde(default)]
    pub coast: Vec<CoastPlacement>,
    /// Player starts and NPCs
    #[serde(default)]
    pub entities: Vec<EntityPlacement>,
}

/// The running game world.
#[derive(Debug)]
pub struct World {
    /// Tuning values
    config: GameplayConfig,
    /// World time in milliseconds
    clock_ms: u64,
    /// Sub-millisecond remainder of the clock
    clock_carry: f64,
    /// The player
    player: Player,
    /// NPCs, in placement order
    characters: Vec<Character>,
    /// Non-moving sprites
    sprites: Vec<StaticSprite>,
    /// Everything the player collides with
    obstacles: ObstacleSet,
    /// The one active conversation, if any
    dialog: Option<DialogSession>,
    /// Camera and paint order
    render: RenderGroup,
    /// Outgoing events for presentation code
    bus: EventBus,
}

impl World {
    /// Build the world from a parsed map, spawning the player at the start
    /// named `spawn`.
    ///
    /// Unknown graphics, characters, animations, empty dialog and a missing
    /// player start all fail here.
    pub fn setup(
        map: &MapData,
        spawn: &str,
        assets: &impl AssetProvider,
        mut config: GameplayConfig,
    ) -> ContentResult<Self> {
        config.validate();
        let tile = config.tile_size as f32;
        let mut sprites = Vec::new();
        let mut obstacles = ObstacleSet::new();

        for tile_image in &map.terrain {
            sprites.push(StaticSprite::from_frames(
                SpriteKind::Terrain,
                tile_image.pos,
                vec![tile_image.image.clone()],
            ));
        }

        for object in &map.objects {
            let kind = if object.top {
                SpriteKind::Top
            } else {
                SpriteKind::Collidable
            };
            let sprite = StaticSprite::from_frames(kind, object.pos, vec![object.image.clone()]);
            if sprite.kind().is_solid() {
                obstacles.push_static(*sprite.rect(), *sprite.hitbox());
            }
            sprites.push(sprite);
        }

        for area in &map.borders {
            let sprite = StaticSprite::new(SpriteKind::Border, area.topleft(), area.size(), Vec::new());
            obstacles.push_static(*sprite.rect(), *sprite.hitbox());
            sprites.push(sprite);
        }

        for patch in &map.monster_patches {
            sprites.push(StaticSprite::from_frames(
                SpriteKind::MonsterPatch {
                    biome: patch.biome.clone(),
                },
                patch.pos,
                vec![patch.image.clone()],
            ));
        }

        if !map.water.is_empty() {
            let frames = assets.animation(WATER_ANIMATION)?.to_vec();
            for area in &map.water {
                let mut y = area.top();
                while y < area.bottom() {
                    let mut x = area.left();
                    while x < area.right() {
                        sprites.push(
                            StaticSprite::from_frames(
                                SpriteKind::Animated,
                                Vec2::new(x, y),
                                frames.clone(),
                            )
                            .with_layer(WorldLayer::Water),
                        );
                        x += tile;
                    }
                    y += tile;
                }
            }
        }

        for coast in &map.coast {
            let frames = assets.animation(&coast.animation)?.to_vec();
            sprites.push(
                StaticSprite::from_frames(SpriteKind::Animated, coast.pos, frames)
                    .with_layer(WorldLayer::Background),
            );
        }

        let mut player = None;
        let mut characters = Vec::new();
        for placement in &map.entities {
            match placement {
                EntityPlacement::Player {
                    pos,
                    direction,
                    start,
                } if start == spawn => {
                    let frames = assets.frame_set("player")?;
                    player = Some(Player::new(*pos, *direction, frames, &config));
                },
                EntityPlacement::Player { .. } => {},
                EntityPlacement::Character {
                    pos,
                    direction,
                    graphic,
                    character_id,
                } => {
                    let frames = assets.frame_set(graphic)?;
                    let data = assets.character_data(character_id)?.clone();
                    if data.current_lines().is_empty() {
                        return Err(ContentError::EmptyDialog(character_id.to_string()));
                    }
                    let character = Character::new(
                        character_id.clone(),
                        data,
                        *pos,
                        *direction,
                        frames,
                        &config,
                        0,
                    );
                    obstacles.upsert_owned(
                        character.id(),
                        *character.entity().rect(),
                        *character.entity().hitbox(),
                    );
                    characters.push(character);
                },
            }
        }
        let player = player.ok_or_else(|| ContentError::MissingPlayerStart(spawn.to_string()))?;

        let render = RenderGroup::new(
            config.window_size(),
            config.shadow_offset,
            assets.shadow().cloned(),
        );

        info!(
            spawn,
            sprites = sprites.len(),
            characters = characters.len(),
            obstacles = obstacles.len(),
            "World set up"
        );

        Ok(Self {
            config,
            clock_ms: 0,
            clock_carry: 0.0,
            player,
            characters,
            sprites,
            obstacles,
            dialog: None,
            render,
            bus: EventBus::default(),
        })
    }

    /// Tuning values.
    #[must_use]
    pub const fn config(&self) -> &GameplayConfig {
        &self.config
    }

    /// World time in milliseconds.
    #[must_use]
    pub const fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// The player.
    #[must_use]
    pub const fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable player.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// NPCs in placement order.
    #[must_use]
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// NPC by character id.
    #[must_use]
    pub fn character(&self, id: &CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| c.character_id() == id)
    }

    /// Static sprites.
    #[must_use]
    pub fn sprites(&self) -> &[StaticSprite] {
        &self.sprites
    }

    /// Obstacle set.
    #[must_use]
    pub const fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    /// Active dialog session.
    #[must_use]
    pub const fn dialog(&self) -> Option<&DialogSession> {
        self.dialog.as_ref()
    }

    /// Outgoing event bus.
    #[must_use]
    pub const fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    /// Advance the world by `dt` seconds.
    ///
    /// Returns this frame's events, which are also published on the bus.
    pub fn update(&mut self, dt: f32, input: &impl InputSource) -> Vec<GameEvent> {
        let now = self.advance_clock(dt);
        let mut events = Vec::new();

        if self.dialog.is_none() && input.just_pressed(Key::Interact) {
            self.interact(now, &mut events);
        }

        self.player
            .update(dt, input, &self.obstacles, self.config.animation_speed);

        let mut requests = Vec::new();
        for (index, character) in self.characters.iter_mut().enumerate() {
            let blockers = self.obstacles.sight_blockers(character.id());
            match character.update(dt, now, &mut self.player, blockers) {
                Some(CharacterEvent::NoticedPlayer) => {
                    events.push(GameEvent::NpcNoticedPlayer {
                        npc: character.id(),
                        character: character.character_id().clone(),
                    });
                    events.push(GameEvent::NoticeIndicator { visible: true });
                },
                Some(CharacterEvent::DialogRequested) => {
                    events.push(GameEvent::NoticeIndicator { visible: false });
                    requests.push(index);
                },
                None => {},
            }
            self.obstacles.upsert_owned(
                character.id(),
                *character.entity().rect(),
                *character.entity().hitbox(),
            );
        }
        for index in requests {
            self.open_dialog(index, now, &mut events);
        }

        for sprite in &mut self.sprites {
            sprite.update(dt, self.config.animation_speed);
        }

        if let Some(session) = &mut self.dialog {
            let dialog_events = session.update(now, input.just_pressed(Key::Interact));
            let npc = session.npc();
            let mut completed = false;
            for event in dialog_events {
                match event {
                    DialogEvent::LineShown { index, text } => {
                        events.push(GameEvent::DialogLineShown { npc, index, text });
                    },
                    DialogEvent::LineRetired { index } => {
                        events.push(GameEvent::DialogLineRetired { npc, index });
                    },
                    DialogEvent::Completed => completed = true,
                }
            }
            if completed {
                if let Ok(ended) = self.end_dialog() {
                    events.push(ended);
                }
            }
        }

        self.bus.publish_all(&events);
        events
    }

    /// Player-initiated talk with the first NPC, in placement order, within
    /// the interaction radius. Only that NPC turns to the player.
    fn interact(&mut self, now: u64, events: &mut Vec<GameEvent>) {
        let player_pos = self.player.entity().position();
        let radius = self.config.interaction_radius;
        let Some(index) = self
            .characters
            .iter()
            .position(|c| is_within_range(radius, player_pos, c.entity().position()))
        else {
            return;
        };

        self.player.entity_mut().block();
        self.characters[index].entity_mut().face_towards(player_pos);
        self.open_dialog(index, now, events);
    }

    /// Open a dialog with the NPC at `index`, logging and skipping the
    /// request if another session is running.
    fn open_dialog(&mut self, index: usize, now: u64, events: &mut Vec<GameEvent>) {
        match self.start_dialog_at(index, now) {
            Ok(started) => events.extend(started),
            Err(err) => debug!(%err, "dialog request ignored"),
        }
    }

    fn start_dialog_at(&mut self, index: usize, now: u64) -> DialogResult<Vec<GameEvent>> {
        if let Some(active) = &self.dialog {
            return Err(DialogError::SessionActive(active.character().clone()));
        }
        let character = &self.characters[index];
        let (session, first) = DialogSession::start(
            character.id(),
            character.character_id().clone(),
            character.dialog_lines().to_vec(),
            self.config.dialog_delay_ms,
            now,
        )?;

        let npc = character.id();
        let mut events = vec![GameEvent::DialogStarted {
            npc,
            character: character.character_id().clone(),
        }];
        if let DialogEvent::LineShown { index, text } = first {
            events.push(GameEvent::DialogLineShown { npc, index, text });
        }
        self.dialog = Some(session);
        Ok(events)
    }

    /// Open a dialog with an NPC by character id, blocking the player.
    pub fn start_dialog(&mut self, id: &CharacterId) -> DialogResult<Vec<GameEvent>> {
        let index = self
            .characters
            .iter()
            .position(|c| c.character_id() == id)
            .ok_or_else(|| ContentError::UnknownCharacter(id.to_string()))?;
        let events = self.start_dialog_at(index, self.clock_ms)?;
        self.player.entity_mut().block();
        Ok(events)
    }

    /// Close the active dialog and free the player.
    pub fn end_dialog(&mut self) -> DialogResult<GameEvent> {
        let session = self.dialog.take().ok_or(DialogError::NoActiveSession)?;
        self.player.entity_mut().unblock();
        debug!(character = %session.character(), "dialog ended");
        Ok(GameEvent::DialogEnded {
            npc: session.npc(),
            character: session.character().clone(),
        })
    }

    /// Capture an NPC's perception/approach state.
    #[must_use]
    pub fn snapshot_character(&self, id: &CharacterId) -> Option<CharacterSnapshot> {
        self.character(id).map(Character::snapshot)
    }

    /// Restore an NPC's perception/approach state and refresh its obstacle.
    pub fn restore_character(
        &mut self,
        id: &CharacterId,
        snapshot: &CharacterSnapshot,
    ) -> ContentResult<()> {
        let character = self
            .characters
            .iter_mut()
            .find(|c| c.character_id() == id)
            .ok_or_else(|| ContentError::UnknownCharacter(id.to_string()))?;
        character.restore(snapshot);
        self.obstacles.upsert_owned(
            character.id(),
            *character.entity().rect(),
            *character.entity().hitbox(),
        );
        Ok(())
    }

    /// Entity id of the NPC with the given character id.
    #[must_use]
    pub fn entity_of(&self, id: &CharacterId) -> Option<EntityId> {
        self.character(id).map(Character::id)
    }

    /// Draw the world centred on the player. Returns the number of blits.
    pub fn draw(&self, sink: &mut impl RenderSink) -> usize {
        let items = self
            .sprites
            .iter()
            .filter_map(StaticSprite::render_item)
            .chain(std::iter::once(self.player.entity().render_item()))
            .chain(self.characters.iter().map(|c| c.entity().render_item()));
        self.render
            .draw(self.player.entity().position(), items, sink)
    }

    fn advance_clock(&mut self, dt: f32) -> u64 {
        let ms = f64::from(dt.max(0.0)) * 1000.0 + self.clock_carry;
        let whole = ms.floor();
        self.clock_carry = ms - whole;
        self.clock_ms += whole as u64;
        self.clock_ms
    }
}
