//! Static world sprites: terrain, props, borders, water and monster patches.

use hunter_common::{Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::content::Frame;
use crate::render::{RenderItem, WorldLayer};

/// Monster patches are drawn this far above their centre line.
pub const MONSTER_PATCH_DEPTH_SHIFT: f32 = 40.0;

/// What a static sprite is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpriteKind {
    /// Ground tile, no collision
    Terrain,
    /// Decoration drawn above entities
    Top,
    /// Looping water or coast tile
    Animated,
    /// Tall grass where monsters live
    MonsterPatch {
        /// Biome name; `"sand"` patches lie flat on the background
        biome: String,
    },
    /// Invisible collision area
    Border,
    /// Visible prop that blocks movement
    Collidable,
}

impl SpriteKind {
    /// Default paint layer for this kind.
    #[must_use]
    pub fn layer(&self) -> WorldLayer {
        match self {
            SpriteKind::Terrain => WorldLayer::Background,
            SpriteKind::Top => WorldLayer::Top,
            SpriteKind::Animated | SpriteKind::Border | SpriteKind::Collidable => WorldLayer::Main,
            SpriteKind::MonsterPatch { biome } if biome == "sand" => WorldLayer::Background,
            SpriteKind::MonsterPatch { .. } => WorldLayer::Main,
        }
    }

    /// Whether the player collides with this kind.
    #[must_use]
    pub const fn is_solid(&self) -> bool {
        matches!(self, SpriteKind::Border | SpriteKind::Collidable)
    }

    /// Whether this kind is drawn at all.
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        !matches!(self, SpriteKind::Border)
    }
}

/// A non-moving sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticSprite {
    kind: SpriteKind,
    frames: Vec<Frame>,
    rect: Rect,
    hitbox: Rect,
    layer: WorldLayer,
    depth_key: f32,
    frame_index: f32,
}

impl StaticSprite {
    /// Create a sprite with its top-left corner at `topleft`.
    ///
    /// `frames` must hold at least one frame for visible kinds; borders may
    /// pass an empty list together with an explicit `size`.
    #[must_use]
    pub fn new(kind: SpriteKind, topleft: Vec2, size: Vec2, frames: Vec<Frame>) -> Self {
        let rect = Rect::from_topleft(topleft, size);
        let hitbox = match kind {
            SpriteKind::Collidable => rect.inflate(-rect.width * 0.1, -rect.height * 0.6),
            _ => rect,
        };
        let mut depth_key = rect.center_y();
        if matches!(kind, SpriteKind::MonsterPatch { .. }) {
            depth_key -= MONSTER_PATCH_DEPTH_SHIFT;
        }
        Self {
            layer: kind.layer(),
            kind,
            frames,
            rect,
            hitbox,
            depth_key,
            frame_index: 0.0,
        }
    }

    /// Create a sprite sized by its first frame.
    #[must_use]
    pub fn from_frames(kind: SpriteKind, topleft: Vec2, frames: Vec<Frame>) -> Self {
        let size = frames.first().map_or(Vec2::ZERO, Frame::size);
        Self::new(kind, topleft, size, frames)
    }

    /// Override the paint layer (e.g. water tiles).
    #[must_use]
    pub fn with_layer(mut self, layer: WorldLayer) -> Self {
        self.layer = layer;
        self
    }

    /// Sprite kind.
    #[must_use]
    pub fn kind(&self) -> &SpriteKind {
        &self.kind
    }

    /// Bounding box.
    #[must_use]
    pub const fn rect(&self) -> &Rect {
        &self.rect
    }

    /// Collision box.
    #[must_use]
    pub const fn hitbox(&self) -> &Rect {
        &self.hitbox
    }

    /// Paint layer.
    #[must_use]
    pub const fn layer(&self) -> WorldLayer {
        self.layer
    }

    /// Depth-sort key.
    #[must_use]
    pub const fn depth_key(&self) -> f32 {
        self.depth_key
    }

    /// Advance the frame counter of animated sprites.
    pub fn update(&mut self, dt: f32, animation_speed: f32) {
        if self.kind == SpriteKind::Animated {
            self.frame_index += animation_speed * dt;
        }
    }

    /// Frame currently shown, if the sprite is visible.
    #[must_use]
    pub fn frame(&self) -> Option<&Frame> {
        if !self.kind.is_visible() || self.frames.is_empty() {
            return None;
        }
        let index = (self.frame_index.floor() as usize) % self.frames.len();
        self.frames.get(index)
    }

    /// Render item for this frame, if visible.
    #[must_use]
    pub fn render_item(&self) -> Option<RenderItem<'_>> {
        self.frame().map(|image| RenderItem {
            image,
            rect: self.rect,
            depth_key: self.depth_key,
            layer: self.layer,
            casts_shadow: false,
        })
    }
}
