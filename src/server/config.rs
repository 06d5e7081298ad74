//! Server configuration types

use keybroker_core::gateway::file_store::DEFAULT_STATE_PATH;
use keybroker_core::{KeyringConfig, PermissionConfig, RedirectConfig, RuntimeMode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub environment: RuntimeMode,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub redirect: RedirectConfig,
    #[serde(default)]
    pub events: EventsConfig,
    #[serde(default)]
    pub permissions: PermissionConfig,
}

impl AppConfig {
    /// Settings handed to the keyring
    pub fn keyring_config(&self) -> KeyringConfig {
        KeyringConfig {
            environment: self.environment,
            redirect: self.redirect.clone(),
        }
    }

    /// Location of the state document
    pub fn state_path(&self) -> PathBuf {
        match self.storage.path.as_deref().filter(|p| !p.trim().is_empty()) {
            Some(path) => PathBuf::from(path),
            None => dirs::home_dir()
                .map(|h| h.join(DEFAULT_STATE_PATH))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_PATH)),
        }
    }
}

/// State storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub path: Option<String>,
}

/// Event bus configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    #[serde(default)]
    pub require_subscriber: bool,
}

fn default_capacity() -> usize {
    256
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            require_subscriber: false,
        }
    }
}
