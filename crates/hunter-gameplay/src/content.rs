//! Static game content: frame sets, character data and monster stats.
//!
//! Content arrives as an already-parsed bundle (RON or JSON). String-keyed
//! tables from the file are validated once, here, into enum-keyed structures;
//! anything missing is a [`ContentError`] raised before the world starts.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;
use hunter_common::{
    CharacterId, ContentError, ContentResult, Direction, HunterError, HunterResult, Vec2,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::entity::AnimationState;
use crate::world::MapData;

/// Opaque image handle supplied by the asset loader.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Frame {
    /// Asset key of the image
    pub id: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Frame {
    /// Creates a frame handle.
    #[must_use]
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }

    /// Size in world units.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

/// Frames for every [`AnimationState`] of one graphic.
///
/// Every state has at least one frame; this is checked on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSet {
    frames: [Vec<Frame>; AnimationState::COUNT],
}

impl FrameSet {
    /// Validates a string-keyed frame table (`"up"`, `"up_idle"`, ...).
    pub fn from_map(graphic: &str, table: HashMap<String, Vec<Frame>>) -> ContentResult<Self> {
        let mut frames: [Vec<Frame>; AnimationState::COUNT] = Default::default();
        let mut present = [false; AnimationState::COUNT];

        for (key, list) in table {
            let state = key.parse::<AnimationState>()?;
            if list.is_empty() {
                return Err(ContentError::EmptyFrames {
                    graphic: graphic.to_string(),
                    state: key,
                });
            }
            frames[state.index()] = list;
            present[state.index()] = true;
        }

        if let Some(state) = AnimationState::all().find(|s| !present[s.index()]) {
            return Err(ContentError::MissingAnimationState {
                graphic: graphic.to_string(),
                state: state.key(),
            });
        }

        Ok(Self { frames })
    }

    /// Uses the same frame list for every state.
    pub fn uniform(graphic: &str, list: Vec<Frame>) -> ContentResult<Self> {
        if list.is_empty() {
            return Err(ContentError::EmptyFrames {
                graphic: graphic.to_string(),
                state: "*".to_string(),
            });
        }
        Ok(Self {
            frames: std::array::from_fn(|_| list.clone()),
        })
    }

    /// Frames for a state (never empty).
    #[must_use]
    pub fn frames(&self, state: AnimationState) -> &[Frame] {
        &self.frames[state.index()]
    }

    /// First frame of a state.
    #[must_use]
    pub fn first(&self, state: AnimationState) -> &Frame {
        &self.frames[state.index()][0]
    }

    /// Frame selected by a fractional counter: `floor(counter) mod len`.
    #[must_use]
    pub fn frame_at(&self, state: AnimationState, counter: f32) -> &Frame {
        let list = &self.frames[state.index()];
        let index = (counter.max(0.0).floor() as usize) % list.len();
        &list[index]
    }
}

/// Which dialog line set a character speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogVariant {
    /// Before the character has been beaten
    Default,
    /// After the character has been beaten
    Defeated,
}

impl DialogVariant {
    /// Variant for a `defeated` flag.
    #[must_use]
    pub const fn from_defeated(defeated: bool) -> Self {
        if defeated {
            Self::Defeated
        } else {
            Self::Default
        }
    }
}

/// Dialog line sets of a character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogLines {
    /// Lines spoken by default
    #[serde(default)]
    pub default: Vec<String>,
    /// Lines spoken once defeated
    #[serde(default)]
    pub defeated: Vec<String>,
}

impl DialogLines {
    /// Lines for a variant.
    #[must_use]
    pub fn lines(&self, variant: DialogVariant) -> &[String] {
        match variant {
            DialogVariant::Default => &self.default,
            DialogVariant::Defeated => &self.defeated,
        }
    }
}

fn all_directions() -> Vec<Direction> {
    Direction::ALL.to_vec()
}

/// Static per-character data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterData {
    /// Dialog line sets
    pub dialog: DialogLines,
    /// Directions picked from while looking around
    #[serde(default = "all_directions")]
    pub directions: Vec<Direction>,
    /// Perception radius in world units
    #[serde(default)]
    pub radius: f32,
    /// Whether the character looks around, perceives and approaches
    #[serde(default)]
    pub look_around: bool,
    /// Whether the character has been defeated
    #[serde(default)]
    pub defeated: bool,
}

impl CharacterData {
    /// Active dialog variant.
    #[must_use]
    pub const fn variant(&self) -> DialogVariant {
        DialogVariant::from_defeated(self.defeated)
    }

    /// Lines for the active variant.
    #[must_use]
    pub fn current_lines(&self) -> &[String] {
        self.dialog.lines(self.variant())
    }
}

/// Base stats of a monster species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterStats {
    /// Element (e.g. `"fire"`)
    pub element: String,
    /// Maximum health
    pub max_health: f32,
    /// Maximum energy
    pub max_energy: f32,
    /// Attack
    pub attack: f32,
    /// Defense
    pub defense: f32,
    /// Recovery
    pub recovery: f32,
    /// Speed
    pub speed: f32,
}

/// Source of frames and static data.
pub trait AssetProvider {
    /// Frames of an entity graphic (e.g. `"player"`, `"blond"`).
    fn frame_set(&self, graphic: &str) -> ContentResult<Arc<FrameSet>>;

    /// Frames of a looping tile animation (e.g. `"water"`).
    fn animation(&self, key: &str) -> ContentResult<&[Frame]>;

    /// Static data of a character.
    fn character_data(&self, id: &CharacterId) -> ContentResult<&CharacterData>;

    /// Base stats of a monster species.
    fn monster_stats(&self, name: &str) -> ContentResult<&MonsterStats>;

    /// Image drawn under entities, if any.
    fn shadow(&self) -> Option<&Frame>;
}

/// Content bundle as stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentFile {
    /// Character table
    #[serde(default)]
    pub characters: HashMap<CharacterId, CharacterData>,
    /// Entity graphics: graphic -> state key -> frames
    #[serde(default)]
    pub graphics: HashMap<String, HashMap<String, Vec<Frame>>>,
    /// Looping tile animations
    #[serde(default)]
    pub animations: HashMap<String, Vec<Frame>>,
    /// Monster species
    #[serde(default)]
    pub monsters: HashMap<String, MonsterStats>,
    /// Entity shadow image
    #[serde(default)]
    pub shadow: Option<Frame>,
    /// Parsed maps
    #[serde(default)]
    pub maps: HashMap<String, MapData>,
}

/// Validated content.
#[derive(Debug, Default)]
pub struct Content {
    characters: AHashMap<CharacterId, CharacterData>,
    graphics: AHashMap<String, Arc<FrameSet>>,
    animations: AHashMap<String, Vec<Frame>>,
    monsters: AHashMap<String, MonsterStats>,
    shadow: Option<Frame>,
    maps: AHashMap<String, MapData>,
}

impl Content {
    /// Validates a parsed bundle.
    pub fn from_file(file: ContentFile) -> ContentResult<Self> {
        let mut graphics = AHashMap::with_capacity(file.graphics.len());
        for (graphic, table) in file.graphics {
            let set = FrameSet::from_map(&graphic, table)?;
            graphics.insert(graphic, Arc::new(set));
        }

        for (key, frames) in &file.animations {
            if frames.is_empty() {
                return Err(ContentError::EmptyFrames {
                    graphic: key.clone(),
                    state: "loop".to_string(),
                });
            }
        }

        let content = Self {
            characters: file.characters.into_iter().collect(),
            graphics,
            animations: file.animations.into_iter().collect(),
            monsters: file.monsters.into_iter().collect(),
            shadow: file.shadow,
            maps: file.maps.into_iter().collect(),
        };

        info!(
            characters = content.characters.len(),
            graphics = content.graphics.len(),
            animations = content.animations.len(),
            monsters = content.monsters.len(),
            maps = content.maps.len(),
            "Loaded content"
        );
        Ok(content)
    }

    /// Parses and validates a RON bundle.
    pub fn from_ron_str(text: &str) -> HunterResult<Self> {
        let file: ContentFile =
            ron::from_str(text).map_err(|e| HunterError::Serialization(e.to_string()))?;
        Ok(Self::from_file(file)?)
    }

    /// Parses and validates a JSON bundle.
    pub fn from_json_str(text: &str) -> HunterResult<Self> {
        let file: ContentFile =
            serde_json::from_str(text).map_err(|e| HunterError::Serialization(e.to_string()))?;
        Ok(Self::from_file(file)?)
    }

    /// Loads a bundle from disk; `.json` files are read as JSON, anything
    /// else as RON.
    pub fn load(path: impl AsRef<Path>) -> HunterResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            _ => Self::from_ron_str(&text),
        }
    }

    /// Registers a character (used by tools and tests).
    pub fn insert_character(&mut self, id: CharacterId, data: CharacterData) {
        self.characters.insert(id, data);
    }

    /// Registers an entity graphic.
    pub fn insert_graphic(&mut self, graphic: impl Into<String>, frames: FrameSet) {
        self.graphics.insert(graphic.into(), Arc::new(frames));
    }

    /// Registers a tile animation.
    pub fn insert_animation(&mut self, key: impl Into<String>, frames: Vec<Frame>) {
        self.animations.insert(key.into(), frames);
    }

    /// Registers a monster species.
    pub fn insert_monster(&mut self, name: impl Into<String>, stats: MonsterStats) {
        self.monsters.insert(name.into(), stats);
    }

    /// Parsed map by name.
    pub fn map(&self, name: &str) -> ContentResult<&MapData> {
        self.maps
            .get(name)
            .ok_or_else(|| ContentError::UnknownMap(name.to_string()))
    }

    /// Mutable character data (e.g. to mark a character defeated).
    pub fn character_data_mut(&mut self, id: &CharacterId) -> ContentResult<&mut CharacterData> {
        self.characters
            .get_mut(id)
            .ok_or_else(|| ContentError::UnknownCharacter(id.to_string()))
    }
}

impl AssetProvider for Content {
    fn frame_set(&self, graphic: &str) -> ContentResult<Arc<FrameSet>> {
        self.graphics
            .get(graphic)
            .cloned()
            .ok_or_else(|| ContentError::UnknownGraphic(graphic.to_string()))
    }

    fn animation(&self, key: &str) -> ContentResult<&[Frame]> {
        self.animations
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| ContentError::UnknownGraphic(key.to_string()))
    }

    fn character_data(&self, id: &CharacterId) -> ContentResult<&CharacterData> {
        self.characters
            .get(id)
            .ok_or_else(|| ContentError::UnknownCharacter(id.to_string()))
    }

    fn monster_stats(&self, name: &str) -> ContentResult<&MonsterStats> {
        self.monsters
            .get(name)
            .ok_or_else(|| ContentError::UnknownMonster(name.to_string()))
    }

    fn shadow(&self) -> Option<&Frame> {
        self.shadow.as_ref()
    }
}

/// Frame set where every state has `count` frames named `"{state}_{i}"`.
#[cfg(test)]
pub(crate) fn test_frames(width: u32, height: u32, count: usize) -> Arc<FrameSet> {
    let table = AnimationState::all()
        .map(|state| {
            let frames = (0..count)
                .map(|i| Frame::new(format!("{}_{i}", state.key()), width, height))
                .collect();
            (state.key(), frames)
        })
        .collect();
    Arc::new(FrameSet::from_map("test", table).expect("complete frame table"))
}
