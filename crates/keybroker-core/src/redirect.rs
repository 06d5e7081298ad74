//! Redirect acknowledgment returned by `submitRequest`
//!
//! A submitted request is resolved out-of-band, on the companion app. The
//! caller gets a pointer to it instead of a result.

use serde::{Deserialize, Serialize};

/// Prompt shown next to the redirect link
pub const DEFAULT_REDIRECT_MESSAGE: &str =
    "Open the companion app to approve or reject this request.";

/// Runtime mode that selects the redirect endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    /// Released build
    Production,
    /// Local or staging build
    #[default]
    Development,
}

/// Companion app endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectConfig {
    /// Endpoint used in production
    #[serde(default)]
    pub production_url: Option<String>,
    /// Endpoint used in development
    #[serde(default)]
    pub development_url: Option<String>,
    /// Appended to the endpoint as a path segment
    #[serde(default)]
    pub version: Option<String>,
    /// Human-readable prompt
    #[serde(default = "default_message")]
    pub message: String,
}

fn default_message() -> String {
    DEFAULT_REDIRECT_MESSAGE.to_string()
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            production_url: None,
            development_url: None,
            version: None,
            message: default_message(),
        }
    }
}

impl RedirectConfig {
    /// Endpoint for `mode` with the version suffix, if configured.
    ///
    /// Blank endpoints count as unconfigured.
    #[must_use]
    pub fn url_for(&self, mode: RuntimeMode) -> Option<String> {
        let endpoint = match mode {
            RuntimeMode::Production => self.production_url.as_deref(),
            RuntimeMode::Development => self.development_url.as_deref(),
        }
        .map(str::trim)
        .filter(|e| !e.is_empty())?;

        match self.version.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            Some(version) => Some(format!(
                "{}/{}",
                endpoint.trim_end_matches('/'),
                version.trim_start_matches('/')
            )),
            None => Some(endpoint.to_string()),
        }
    }

    /// Acknowledgment for a request submitted in `mode`
    #[must_use]
    pub fn acknowledgment(&self, mode: RuntimeMode) -> PendingResponse {
        PendingResponse {
            pending: true,
            redirect: Redirect {
                url: self.url_for(mode),
                message: self.message.clone(),
            },
        }
    }
}

/// Where to go to resolve a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    /// Companion app link; absent when not configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Prompt for the user
    pub message: String,
}

/// `{pending: true, redirect: {url, message}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingResponse {
    /// Always true; the result arrives through the event channel
    pub pending: bool,
    /// Redirect details
    pub redirect: Redirect,
}
