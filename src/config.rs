//! Runtime configuration for the provider and the poller
//!
//! Defaults come from [`crate::constants`]; only the base URL can be
//! overridden from the environment.

use crate::constants::{
    refresh_interval, BASE_URL_ENV, COINCAP_API_URL, LIST_SIZE, REQUEST_TIMEOUT_SECS, USER_AGENT,
};
use std::time::Duration;

/// HTTP provider settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// API root, e.g. `https://api.coincap.io/v2`
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: COINCAP_API_URL.to_string(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl ProviderConfig {
    /// Defaults, with `COINCAP_BASE_URL` taking precedence when set and non-empty
    pub fn from_env() -> Self {
        Self::default().with_base_url_override(std::env::var(BASE_URL_ENV).ok())
    }

    fn with_base_url_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            tracing::debug!(base_url = %url, "Using base URL from environment");
            self.base_url = url;
        }
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// List poller settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    /// Wait between two list refreshes
    pub interval: Duration,
    /// Number of assets kept per refresh
    pub list_size: usize,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: refresh_interval(),
            list_size: LIST_SIZE,
        }
    }
}
