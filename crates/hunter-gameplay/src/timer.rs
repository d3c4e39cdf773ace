//! Countdown timers driven by the world clock.
//!
//! Timers do not read a wall clock. Every call takes the current world time in
//! milliseconds, so a frame loop (or a test) decides how time advances. Instead
//! of running a completion callback, [`Timer::update`] reports whether the
//! timer fired and the owner reacts to that.

use serde::{Deserialize, Serialize};
use tracing::trace;

/// A one-shot or repeating countdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    /// Countdown length in milliseconds
    duration_ms: u64,
    /// Whether the countdown is running
    active: bool,
    /// World time (ms) at activation
    start_time: u64,
    /// Restart automatically after firing
    repeat: bool,
}

impl Timer {
    /// Create an inactive one-shot timer.
    #[must_use]
    pub const fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            active: false,
            start_time: 0,
            repeat: false,
        }
    }

    /// Create an inactive repeating timer.
    #[must_use]
    pub const fn repeating(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            active: false,
            start_time: 0,
            repeat: true,
        }
    }

    /// Activate immediately (builder form of [`Timer::activate`]).
    #[must_use]
    pub fn started(mut self, now: u64) -> Self {
        self.activate(now);
        self
    }

    /// Countdown length in milliseconds.
    #[must_use]
    pub const fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// Whether the countdown is running.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the timer restarts after firing.
    #[must_use]
    pub const fn is_repeating(&self) -> bool {
        self.repeat
    }

    /// Start (or restart) the countdown at `now`.
    pub fn activate(&mut self, now: u64) {
        self.active = true;
        self.start_time = now;
    }

    /// Stop the countdown. A repeating timer immediately starts a new period.
    pub fn deactivate(&mut self, now: u64) {
        self.active = false;
        self.start_time = 0;
        if self.repeat {
            self.activate(now);
        }
    }

    /// Advance the timer. Returns `true` exactly once per completed period.
    pub fn update(&mut self, now: u64) -> bool {
        if !self.active {
            return false;
        }
        if now.saturating_sub(self.start_time) >= self.duration_ms {
            trace!(duration_ms = self.duration_ms, now, "timer fired");
            self.deactivate(now);
            return true;
        }
        false
    }
}
