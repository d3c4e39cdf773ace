//! Dialog sessions: one NPC speaking its lines, one bubble at a time.
//!
//! A session does not render anything and does not call back into the world.
//! Starting it and advancing it return [`DialogEvent`]s; the world turns
//! those into game events and closes the session on
//! [`DialogEvent::Completed`].

use hunter_common::{CharacterId, ContentError, EntityId};
use thiserror::Error;
use tracing::debug;

use crate::timer::Timer;

/// Error types for dialog operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialogError {
    /// No dialog is running
    #[error("No active dialog")]
    NoActiveSession,
    /// A dialog is already running
    #[error("A dialog with {0} is already active")]
    SessionActive(CharacterId),
    /// The character has nothing to say
    #[error(transparent)]
    Content(#[from] ContentError),
}

/// Result type for dialog operations.
pub type DialogResult<T> = Result<T, DialogError>;

/// What a session asks the presentation layer to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogEvent {
    /// Show the bubble for a line
    LineShown {
        /// Line index
        index: usize,
        /// Line text
        text: String,
    },
    /// Remove the bubble for a line
    LineRetired {
        /// Line index
        index: usize,
    },
    /// Every line has been read
    Completed,
}

/// A running conversation with one NPC.
#[derive(Debug, Clone)]
pub struct DialogSession {
    /// Speaking NPC
    npc: EntityId,
    /// Character id of the NPC
    character: CharacterId,
    /// Lines, in order
    lines: Vec<String>,
    /// Index of the visible line
    index: usize,
    /// Minimum display time of the visible line
    line_timer: Timer,
    /// Set once the last line has been advanced past
    finished: bool,
}

impl DialogSession {
    /// Open a session showing line 0.
    ///
    /// The line timer starts at `now`; advancing is ignored until it runs
    /// out. Returns the session and the event for the first bubble.
    pub fn start(
        npc: EntityId,
        character: CharacterId,
        lines: Vec<String>,
        delay_ms: u64,
        now: u64,
    ) -> DialogResult<(Self, DialogEvent)> {
        let Some(first) = lines.first().cloned() else {
            return Err(ContentError::EmptyDialog(character.to_string()).into());
        };
        debug!(%character, lines = lines.len(), "dialog started");
        let session = Self {
            npc,
            character,
            lines,
            index: 0,
            line_timer: Timer::new(delay_ms).started(now),
            finished: false,
        };
        Ok((
            session,
            DialogEvent::LineShown {
                index: 0,
                text: first,
            },
        ))
    }

    /// Speaking NPC.
    #[must_use]
    pub const fn npc(&self) -> EntityId {
        self.npc
    }

    /// Character id of the speaking NPC.
    #[must_use]
    pub fn character(&self) -> &CharacterId {
        &self.character
    }

    /// Index of the visible line.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Text of the visible line, if any.
    #[must_use]
    pub fn current_line(&self) -> Option<&str> {
        if self.finished {
            return None;
        }
        self.lines.get(self.index).map(String::as_str)
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always `false`; sessions are never built without lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether the last line has been advanced past.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether the visible line may be advanced past.
    #[must_use]
    pub const fn can_advance(&self) -> bool {
        !self.finished && !self.line_timer.is_active()
    }

    /// Per-frame update: tick the line timer, then advance on a fresh
    /// interact press.
    pub fn update(&mut self, now: u64, advance_pressed: bool) -> Vec<DialogEvent> {
        self.line_timer.update(now);
        if advance_pressed {
            self.advance(now)
        } else {
            Vec::new()
        }
    }

    /// Handle one advance press.
    ///
    /// Ignored while the line timer runs or after completion. Otherwise
    /// retires the visible line and either shows the next one (restarting
    /// the timer) or completes the session.
    pub fn advance(&mut self, now: u64) -> Vec<DialogEvent> {
        if !self.can_advance() {
            return Vec::new();
        }

        let mut events = vec![DialogEvent::LineRetired { index: self.index }];
        self.index += 1;
        if let Some(text) = self.lines.get(self.index) {
            self.line_timer.activate(now);
            debug!(character = %self.character, index = self.index, "dialog line");
            events.push(DialogEvent::LineShown {
                index: self.index,
                text: text.clone(),
            });
        } else {
            self.finished = true;
            debug!(character = %self.character, "dialog completed");
            events.push(DialogEvent::Completed);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("line {i}")).collect()
    }

    fn session(n: usize) -> DialogSession {
        let (session, first) =
            DialogSession::start(EntityId::new(), CharacterId::new("o1"), lines(n), 500, 0)
                .expect("non-empty lines");
        assert_eq!(
            first,
            DialogEvent::LineShown {
                index: 0,
                text: "line 0".into()
            }
        );
        session
    }

    fn completions(events: &[DialogEvent]) -> usize {
        events
            .iter()
            .filter(|e| **e == DialogEvent::Completed)
            .count()
    }

    #[test]
    fn test_empty_lines_rejected() {
        let err = DialogSession::start(EntityId::new(), CharacterId::new("mute"), Vec::new(), 500, 0)
            .expect_err("empty");
        assert_eq!(
            err,
            DialogError::Content(ContentError::EmptyDialog("mute".into()))
        );
    }

    #[test]
    fn test_three_line_dialog() {
        let mut session = session(3);

        // Timer still running: ignored.
        assert!(session.update(100, true).is_empty());
        assert_eq!(session.index(), 0);

        let events = session.update(500, true);
        assert_eq!(
            events,
            vec![
                DialogEvent::LineRetired { index: 0 },
                DialogEvent::LineShown {
                    index: 1,
                    text: "line 1".into()
                },
            ]
        );

        // Each new line restarts the timer.
        assert!(session.update(600, true).is_empty());
        assert_eq!(session.update(1000, true).len(), 2);
        assert_eq!(session.index(), 2);
        assert_eq!(session.current_line(), Some("line 2"));

        let mut total = 0;
        let events = session.update(1500, true);
        total += completions(&events);
        assert_eq!(events[0], DialogEvent::LineRetired { index: 2 });
        assert!(session.is_finished());
        assert_eq!(session.current_line(), None);

        // Further presses do nothing.
        total += completions(&session.update(5000, true));
        total += completions(&session.advance(6000));
        assert_eq!(total, 1);
    }

    #[test]
    fn test_held_key_without_edge_does_not_advance() {
        let mut session = session(2);
        assert!(session.update(1000, false).is_empty());
        assert!(session.can_advance());
        assert_eq!(session.index(), 0);
    }

    #[test]
    fn test_single_line_completes_on_first_advance() {
        let mut session = session(1);
        let events = session.update(500, true);
        assert_eq!(
            events,
            vec![DialogEvent::LineRetired { index: 0 }, DialogEvent::Completed]
        );
    }
}
