//! Configuration validation

use super::config::AppConfig;
use anyhow::{bail, Context, Result};
use keybroker_core::{OriginPermissions, RuntimeMode};
use tracing::warn;

/// Validate configuration and build the permission table from it
pub fn validate_config(config: &AppConfig) -> Result<OriginPermissions> {
    if config.events.capacity == 0 {
        bail!("events.capacity must be greater than zero");
    }

    let permissions = OriginPermissions::from_config(&config.permissions)
        .context("Invalid permissions table")?;

    if config.permissions.origins.is_empty() {
        warn!("No origins configured; every call will be denied");
    }

    if config
        .redirect
        .url_for(config.environment)
        .is_none()
    {
        warn!(
            environment = ?config.environment,
            "No redirect endpoint configured; submitted requests will carry no URL"
        );
    }

    if config.environment == RuntimeMode::Production && !config.events.require_subscriber {
        warn!(
            "events.require_subscriber is off in production; account changes may go unnoticed by the host"
        );
    }

    Ok(permissions)
}
