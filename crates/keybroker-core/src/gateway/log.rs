use async_trait::async_trait;
use tracing::info;

use super::events::KeyringEvent;
use super::traits::EventEmitter;
use crate::error::Result;

/// Emitter that records each event in the log and never fails.
///
/// Used when the operator drives the keyring from a terminal and there is no
/// host listening for notifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEmitter;

#[async_trait]
impl EventEmitter for TracingEmitter {
    async fn emit(&self, event: KeyringEvent) -> Result<()> {
        info!(event = event.kind(), payload = %event.payload(), "Keyring event");
        Ok(())
    }
}
