//! # Hunter Gameplay
//!
//! Gameplay core for Monster Hunter.
//!
//! This crate provides the CPU-side world and everything that lives in it:
//! - Entities with directional animation and hitboxes
//! - Player movement with axis-separated collision
//! - NPC look-around, perception and the one-shot approach
//! - Dialog sessions
//! - Camera-relative, depth-sorted compositing into a render sink
//! - The monster roster and its index
//! - Event bus for presentation code

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod character;
pub mod collision;
pub mod config;
pub mod content;
pub mod dialog;
pub mod entity;
pub mod events;
pub mod geometry;
pub mod input;
pub mod monster;
pub mod monster_index;
pub mod player;
pub mod render;
pub mod sprites;
pub mod timer;
pub mod world;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::character::*;
    pub use crate::collision::*;
    pub use crate::config::*;
    pub use crate::content::*;
    pub use crate::dialog::*;
    pub use crate::entity::*;
    pub use crate::events::*;
    pub use crate::geometry::*;
    pub use crate::input::*;
    pub use crate::monster::*;
    pub use crate::monster_index::*;
    pub use crate::player::*;
    pub use crate::render::*;
    pub use crate::sprites::*;
    pub use crate::timer::*;
    pub use crate::world::*;
}

pub use prelude::*;
