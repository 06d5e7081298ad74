use async_trait::async_trait;

use super::events::KeyringEvent;
use crate::error::Result;
use crate::state::KeyringState;

/// Durable storage for the keyring aggregate
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the aggregate; an absent document yields the empty state
    async fn load(&self) -> Result<KeyringState>;

    /// Durably write the whole aggregate
    async fn persist(&self, state: &KeyringState) -> Result<()>;
}

/// Observer of keyring lifecycle events
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventEmitter: Send + Sync {
    /// Deliver one event; callers decide whether a failure is fatal
    async fn emit(&self, event: KeyringEvent) -> Result<()>;
}
