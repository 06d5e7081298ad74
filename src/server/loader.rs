//! Configuration loading
//!
//! Handles loading configuration from embedded defaults, files, and environment.

use super::config::AppConfig;
use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};

/// Embedded default configuration (compiled into binary)
pub const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Load configuration from files and environment
pub fn load_config() -> Result<AppConfig> {
    let config = Config::builder()
        // 1. Embedded defaults (always available)
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        // 2. External overrides (optional)
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            File::with_name(&format!(
                "config/{}",
                std::env::var("KEYBROKER_ENV").unwrap_or_else(|_| "development".to_string())
            ))
            .required(false),
        )
        .add_source(File::with_name("config/local").required(false))
        // 3. Environment variables (highest priority), KEYBROKER_STORAGE__PATH style
        .add_source(
            Environment::with_prefix("KEYBROKER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    config
        .try_deserialize()
        .context("Failed to deserialize configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use keybroker_core::{Operation, OriginPermissions, RuntimeMode};

    #[test]
    fn test_embedded_defaults_parse() {
        let config: AppConfig = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.environment, RuntimeMode::Development);
        assert_eq!(config.events.capacity, 256);
        assert!(config.redirect.development_url.is_some());

        let table = OriginPermissions::from_config(&config.permissions).unwrap();
        assert_eq!(table.allowed("companion").len(), Operation::ALL.len());
        assert!(table.is_allowed("wallet", Operation::SubmitRequest));
        assert!(!table.is_allowed("wallet", Operation::ApproveRequest));
    }
}
