//! Server configuration.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use keyclaim_core::UpdateError;

/// Configuration for a keyclaim server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen address (default: 0.0.0.0:8053).
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    /// Base domain under which subdomains are claimed (e.g. `dyn.example.net`).
    pub domain: String,

    /// TTL of ownership records in seconds. Long, since ownership is durable.
    #[serde(default = "default_ownership_ttl")]
    pub ownership_ttl_secs: u32,

    /// TTL of address records in seconds. Short, since addresses are dynamic.
    #[serde(default = "default_address_ttl")]
    pub address_ttl_secs: u32,

    /// Per-key request quota.
    #[serde(default)]
    pub rate: RateConfig,
}

/// Per-public-key request quota over a rolling window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateConfig {
    /// Maximum accepted-for-limiting requests per key per window.
    #[serde(default = "default_rate_max")]
    pub max_requests: u32,

    /// Window length in seconds.
    #[serde(default = "default_rate_window")]
    pub window_secs: u64,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            max_requests: default_rate_max(),
            window_secs: default_rate_window(),
        }
    }
}

impl RateConfig {
    /// Window length as a [`Duration`].
    #[must_use]
    pub const fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl ServerConfig {
    /// Config with defaults for everything but the base domain.
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            listen: default_listen(),
            domain: domain.into(),
            ownership_ttl_secs: default_ownership_ttl(),
            address_ttl_secs: default_address_ttl(),
            rate: RateConfig::default(),
        }
    }

    /// Load config from a TOML file.
    pub fn load(path: &std::path::Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| UpdateError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs that cannot serve anything.
    pub fn validate(&self) -> crate::Result<()> {
        if self.domain.is_empty() {
            return Err(UpdateError::Config("domain must not be empty".into()));
        }
        if self.rate.max_requests == 0 || self.rate.window_secs == 0 {
            return Err(UpdateError::Config(
                "rate.max_requests and rate.window_secs must be positive".into(),
            ));
        }
        Ok(())
    }
}

// Default value functions for serde.
fn default_listen() -> SocketAddr {
    "0.0.0.0:8053".parse().expect("valid default addr")
}

const fn default_ownership_ttl() -> u32 {
    300
}

const fn default_address_ttl() -> u32 {
    60
}

const fn default_rate_max() -> u32 {
    10
}

const fn default_rate_window() -> u64 {
    300
}
