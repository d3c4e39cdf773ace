//! Events emitted by the world and the bus that carries them to presentation.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use tracing::warn;

use hunter_common::{CharacterId, EntityId};

/// Things that happened during a world update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// An NPC saw the player and blocked them
    NpcNoticedPlayer {
        /// NPC entity
        npc: EntityId,
        /// NPC character id
        character: CharacterId,
    },
    /// Show or hide the "!" indicator above the player
    NoticeIndicator {
        /// Whether the indicator is shown
        visible: bool,
    },
    /// A dialog session opened
    DialogStarted {
        /// NPC entity
        npc: EntityId,
        /// NPC character id
        character: CharacterId,
    },
    /// A dialog line bubble should be shown
    DialogLineShown {
        /// NPC entity speaking
        npc: EntityId,
        /// Line index
        index: usize,
        /// Line text
        text: String,
    },
    /// The current dialog bubble should be removed
    DialogLineRetired {
        /// NPC entity speaking
        npc: EntityId,
        /// Line index
        index: usize,
    },
    /// The dialog session closed and the player is free again
    DialogEnded {
        /// NPC entity
        npc: EntityId,
        /// NPC character id
        character: CharacterId,
    },
}

/// Event bus for handing events to presentation code.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<GameEvent>,
    /// Receiver for collecting events
    receiver: Receiver<GameEvent>,
    /// Channel capacity
    capacity: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
        }
    }

    /// Publishes an event. A full bus drops the event with a warning.
    pub fn publish(&self, event: GameEvent) {
        if let Err(err) = self.sender.try_send(event) {
            warn!(capacity = self.capacity, "event bus full, dropping {:?}", err.into_inner());
        }
    }

    /// Publishes a batch of events in order.
    pub fn publish_all<'a>(&self, events: impl IntoIterator<Item = &'a GameEvent>) {
        for event in events {
            self.publish(event.clone());
        }
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<GameEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Returns the channel capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a new sender handle for publishing events.
    #[must_use]
    pub fn sender(&self) -> Sender<GameEvent> {
        self.sender.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_drain_in_order() {
        let bus = EventBus::new(8);
        bus.publish(GameEvent::NoticeIndicator { visible: true });
        bus.publish(GameEvent::NoticeIndicator { visible: false });
        assert_eq!(bus.pending_count(), 2);
        assert_eq!(
            bus.drain(),
            vec![
                GameEvent::NoticeIndicator { visible: true },
                GameEvent::NoticeIndicator { visible: false },
            ]
        );
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_full_bus_drops() {
        let bus = EventBus::new(1);
        let events = [
            GameEvent::NoticeIndicator { visible: true },
            GameEvent::NoticeIndicator { visible: false },
        ];
        bus.publish_all(&events);
        assert_eq!(bus.drain(), vec![GameEvent::NoticeIndicator { visible: true }]);
    }

    #[test]
    fn test_sender_handle_shares_channel() {
        let bus = EventBus::default();
        let sender = bus.sender();
        sender
            .send(GameEvent::NoticeIndicator { visible: true })
            .expect("bus open");
        assert_eq!(bus.pending_count(), 1);
        assert_eq!(bus.capacity(), 1024);
    }
}
