//! Keyring builder for operator commands

use anyhow::{Context, Result};
use keybroker_core::{JsonFileStore, Keyring, StateLock, TracingEmitter};
use std::sync::Arc;
use tracing::debug;

use super::loader::load_config;

/// Build a keyring on the configured state file for one-shot CLI use.
///
/// Fails while `keybroker serve` holds the state file; requests it has
/// loaded must be resolved through its bridge. Keep the returned lock
/// alive for as long as the keyring is used. Events go to the log since
/// no host is attached.
pub fn build_keyring_for_cli() -> Result<(Keyring, StateLock)> {
    let config = load_config().context("Failed to load configuration")?;
    let store = JsonFileStore::with_path(config.state_path());
    let lock = store.try_lock().context(
        "The state file is in use, probably by `keybroker serve`; resolve requests through its bridge instead",
    )?;
    debug!("State file: {}", store.path().display());

    let keyring = Keyring::new(
        Arc::new(store),
        Arc::new(TracingEmitter),
        config.keyring_config(),
    );
    Ok((keyring, lock))
}
