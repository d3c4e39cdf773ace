//! Input handling for the headless runner.
//!
//! Plays a key script into the gameplay input state, one frame at a time.

use hunter_gameplay::input::{InputState, Key};

use crate::config::InputStep;

/// Replays [`InputStep`]s frame by frame, then holds nothing.
#[derive(Debug)]
pub struct ScriptedInput {
    /// Steps, in order
    steps: Vec<InputStep>,
    /// Frames played so far
    played: u32,
    /// Frames covered by the script
    total: u32,
    /// Gameplay-facing key state
    state: InputState,
}

impl ScriptedInput {
    /// Create a player for `steps`.
    #[must_use]
    pub fn new(steps: Vec<InputStep>) -> Self {
        let total = steps.iter().map(|step| step.frames).sum();
        Self {
            steps,
            played: 0,
            total,
            state: InputState::new(),
        }
    }

    /// Keys held on frame `frame` of the script.
    fn keys_at(&self, frame: u32) -> &[Key] {
        let mut start = 0;
        for step in &self.steps {
            if frame < start + step.frames {
                return &step.keys;
            }
            start += step.frames;
        }
        &[]
    }

    /// Advance one frame and return the input to feed the world.
    pub fn next_frame(&mut self) -> &InputState {
        let keys = self.keys_at(self.played).to_vec();
        self.state.end_frame();
        self.state.update_all(&keys);
        self.played = self.played.saturating_add(1);
        &self.state
    }

    /// Whether every step has been played.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.played >= self.total
    }
}
