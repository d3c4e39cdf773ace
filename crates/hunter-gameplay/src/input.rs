//! Input abstraction for the fixed game key set.
//!
//! The frame loop feeds raw key levels into [`InputState`] once per frame;
//! gameplay code only reads through the [`InputSource`] trait, which exposes
//! held keys (continuous movement) and just-pressed edges (interaction and
//! dialog advance).

use hunter_common::Vec2;
use serde::{Deserialize, Serialize};

/// Keys the game reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    /// Move up
    Up,
    /// Move down
    Down,
    /// Move left
    Left,
    /// Move right
    Right,
    /// Talk / advance dialog / select
    Interact,
}

impl Key {
    /// Number of keys.
    pub const COUNT: usize = 5;

    /// All keys, in [`Key::index`] order.
    pub const ALL: [Key; Self::COUNT] = [Key::Up, Key::Down, Key::Left, Key::Right, Key::Interact];

    /// Dense index in `0..COUNT`.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Key::Up => 0,
            Key::Down => 1,
            Key::Left => 2,
            Key::Right => 3,
            Key::Interact => 4,
        }
    }
}

/// Read-only view of this frame's input.
pub trait InputSource {
    /// Whether `key` is held down now.
    fn is_held(&self, key: Key) -> bool;

    /// Whether `key` went down this frame.
    fn just_pressed(&self, key: Key) -> bool;
}

/// Unit movement vector from the held directional keys.
///
/// Diagonals are allowed; opposite keys cancel. No keys gives zero.
#[must_use]
pub fn movement_vector(input: &impl InputSource) -> Vec2 {
    let axis = |neg: Key, pos: Key| -> f32 {
        f32::from(u8::from(input.is_held(pos))) - f32::from(u8::from(input.is_held(neg)))
    };
    Vec2::new(axis(Key::Left, Key::Right), axis(Key::Up, Key::Down)).normalize_or_zero()
}

/// State of a button (pressed, just pressed, released).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ButtonState {
    /// Whether the button is currently held down
    pub pressed: bool,
    /// Whether the button was just pressed this frame
    pub just_pressed: bool,
    /// Whether the button was just released this frame
    pub just_released: bool,
}

impl ButtonState {
    /// Update from the current level of the key.
    pub fn update(&mut self, is_pressed: bool) {
        self.just_pressed = is_pressed && !self.pressed;
        self.just_released = !is_pressed && self.pressed;
        self.pressed = is_pressed;
    }

    /// Clear the edge flags.
    pub fn clear_frame(&mut self) {
        self.just_pressed = false;
        self.just_released = false;
    }
}

/// Edge-tracking key state for the game key set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    keys: [ButtonState; Key::COUNT],
}

impl InputState {
    /// All keys released.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current level of one key.
    pub fn update_key(&mut self, key: Key, is_pressed: bool) {
        self.keys[key.index()].update(is_pressed);
    }

    /// Feed a whole frame: every key in `held` is down, every other key up.
    pub fn update_all(&mut self, held: &[Key]) {
        for key in Key::ALL {
            self.update_key(key, held.contains(&key));
        }
    }

    /// Clear edge flags. Call at the end of each frame.
    pub fn end_frame(&mut self) {
        for state in &mut self.keys {
            state.clear_frame();
        }
    }

    /// Raw state of one key.
    #[must_use]
    pub fn button(&self, key: Key) -> ButtonState {
        self.keys[key.index()]
    }
}

impl InputSource for InputState {
    fn is_held(&self, key: Key) -> bool {
        self.keys[key.index()].pressed
    }

    fn just_pressed(&self, key: Key) -> bool {
        self.keys[key.index()].just_pressed
    }
}
