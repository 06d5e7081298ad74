//! Bridge initialization and run loop

use anyhow::{Context, Result};
use keybroker_core::{EventBus, JsonFileStore, Keyring};
use std::sync::Arc;
use tracing::info;

use super::loader::load_config;
use super::validation::validate_config;
use crate::rpc::RpcBridge;

/// Load configuration, open the state file and serve the bridge until stdin closes.
pub async fn run() -> Result<()> {
    info!("Starting keybroker v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config().context("Failed to load configuration")?;
    info!(environment = ?config.environment, "Configuration loaded");

    let permissions = Arc::new(validate_config(&config)?);

    let store = JsonFileStore::with_path(config.state_path());
    // Held until the bridge stops; operator commands cannot open the state meanwhile
    let _lock = store
        .try_lock()
        .context("Another keybroker process is using the state file")?;
    info!("State file: {}", store.path().display());

    let event_bus = Arc::new(
        EventBus::new(config.events.capacity).require_subscriber(config.events.require_subscriber),
    );
    let keyring = Arc::new(Keyring::new(
        Arc::new(store),
        event_bus.clone(),
        config.keyring_config(),
    ));

    RpcBridge::new(keyring, permissions, event_bus).run().await
}
