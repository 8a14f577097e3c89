//! Constants for the asset watcher
//!
//! Compile-time defaults for the provider, store and poller. Only the API
//! base URL can be overridden at runtime (see `ProviderConfig::from_env`).

use std::time::Duration;

/// CoinCap API base URL
pub const COINCAP_API_URL: &str = "https://api.coincap.io/v2";

/// Endpoint for the asset list; single assets live under `{ASSETS_ENDPOINT}/{id}`
pub const ASSETS_ENDPOINT: &str = "assets";

/// Environment variable overriding the API base URL
pub const BASE_URL_ENV: &str = "COINCAP_BASE_URL";

/// Number of assets kept by each list refresh
pub const LIST_SIZE: usize = 10;

/// How often the list poller refreshes (in seconds)
pub const REFRESH_INTERVAL_SECS: u64 = 60;

/// HTTP request timeout (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Capacity of the store event broadcast channel
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// User agent for HTTP requests
pub const USER_AGENT: &str = "asset-watch/0.1.0";

/// Default refresh interval as a `Duration`
pub const fn refresh_interval() -> Duration {
    Duration::from_secs(REFRESH_INTERVAL_SECS)
}
