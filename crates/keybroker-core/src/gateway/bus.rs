use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use super::events::KeyringEvent;
use super::traits::EventEmitter;
use crate::error::{Error, Result};

/// Broadcast-based event bus for keyring lifecycle events.
///
/// Uses `tokio::broadcast` so the RPC bridge and any other subscriber get
/// their own copy of every event. Slow subscribers lag rather than block.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<KeyringEvent>,
    require_subscriber: bool,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            require_subscriber: false,
        }
    }

    /// Treat an event with nobody listening as a failed notification.
    #[must_use]
    pub fn require_subscriber(mut self, required: bool) -> Self {
        self.require_subscriber = required;
        self
    }

    /// Subscribe to events. Returns a receiver that will get all future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<KeyringEvent> {
        self.sender.subscribe()
    }

    /// Publish an event to all active subscribers.
    ///
    /// Returns the number of subscribers that received the event.
    pub fn publish(&self, event: KeyringEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Get the current number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl EventEmitter for EventBus {
    async fn emit(&self, event: KeyringEvent) -> Result<()> {
        let kind = event.kind();
        let delivered = self.publish(event);
        debug!(event = kind, subscribers = delivered, "Keyring event published");
        if delivered == 0 && self.require_subscriber {
            return Err(Error::Notification(format!(
                "no subscriber received {}",
                kind
            )));
        }
        Ok(())
    }
}
