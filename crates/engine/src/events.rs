//! In-process catalog events backed by a `tokio::sync::broadcast` channel.
//!
//! The engine publishes a [`CatalogEvent`] whenever its observable state
//! changes or an operation fails, so a presentation layer can re-render
//! without polling.

use tokio::sync::broadcast;

use catalog_core::ProjectId;

// ---------------------------------------------------------------------------
// CatalogEvent
// ---------------------------------------------------------------------------

/// Something that happened to the catalog view.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogEvent {
    /// A page response was committed.
    PageLoaded {
        page: u32,
        total_pages: u32,
        count: usize,
    },

    /// The full snapshot used for search was replaced.
    SnapshotRefreshed { count: usize },

    /// A create (`id` is `None`) or update was accepted by the server.
    ProjectSaved {
        id: Option<ProjectId>,
        message: Option<String>,
    },

    ProjectDeleted { id: ProjectId },

    /// The session was dropped after an authorization failure.
    SessionExpired,

    /// An operation failed with an operator-facing message.
    Failed { message: String },
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// Fan-out bus for [`CatalogEvent`]s.
///
/// When the buffer is full, the oldest unread events are dropped and slow
/// receivers observe `RecvError::Lagged`.
pub struct EventBus {
    sender: broadcast::Sender<CatalogEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers. Dropped if there are none.
    pub fn publish(&self, event: CatalogEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn every_subscriber_sees_the_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(CatalogEvent::ProjectDeleted {
            id: ProjectId::new("4"),
        });

        let expected = CatalogEvent::ProjectDeleted {
            id: ProjectId::new("4"),
        };
        assert_eq!(rx1.recv().await.unwrap(), expected);
        assert_eq!(rx2.recv().await.unwrap(), expected);
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        EventBus::default().publish(CatalogEvent::SessionExpired);
    }
}
