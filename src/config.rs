//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::StoreConfig;
use crate::error::Result;

/// Store holding rendered handler responses.
pub const RESPONSES_STORE: &str = "responses";
/// Store holding query results fingerprinted with `QueryKey`.
pub const QUERIES_STORE: &str = "queries";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Background TTL sweep interval in seconds
    pub cleanup_interval: u64,
    /// Capacity and TTL of the response store
    pub responses: StoreConfig,
    /// Capacity and TTL of the query store
    pub queries: StoreConfig,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 30)
    /// - `RESPONSE_CACHE_MAX_ENTRIES` - Response store capacity (default: 500)
    /// - `RESPONSE_CACHE_TTL` - Response store default TTL in seconds (default: 300)
    /// - `QUERY_CACHE_MAX_ENTRIES` - Query store capacity (default: 1000)
    /// - `QUERY_CACHE_TTL` - Query store default TTL in seconds (default: 600)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            responses: StoreConfig::new(
                env_or("RESPONSE_CACHE_MAX_ENTRIES", defaults.responses.max_size),
                Duration::from_secs(env_or(
                    "RESPONSE_CACHE_TTL",
                    defaults.responses.default_ttl.as_secs(),
                )),
            ),
            queries: StoreConfig::new(
                env_or("QUERY_CACHE_MAX_ENTRIES", defaults.queries.max_size),
                Duration::from_secs(env_or(
                    "QUERY_CACHE_TTL",
                    defaults.queries.default_ttl.as_secs(),
                )),
            ),
        }
    }

    /// Named stores created at startup.
    pub fn stores(&self) -> [(&'static str, StoreConfig); 2] {
        [(RESPONSES_STORE, self.responses), (QUERIES_STORE, self.queries)]
    }

    /// Rejects store configs with zero capacity or zero TTL.
    pub fn validate(&self) -> Result<()> {
        for (_, store) in self.stores() {
            store.validate()?;
        }
        Ok(())
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cleanup_interval: 30,
            responses: StoreConfig::new(500, Duration::from_secs(300)),
            queries: StoreConfig::new(1000, Duration::from_secs(600)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 30);
        assert_eq!(config.responses.max_size, 500);
        assert_eq!(config.queries.default_ttl, Duration::from_secs(600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for name in [
            "SERVER_PORT",
            "CLEANUP_INTERVAL",
            "RESPONSE_CACHE_MAX_ENTRIES",
            "RESPONSE_CACHE_TTL",
            "QUERY_CACHE_MAX_ENTRIES",
            "QUERY_CACHE_TTL",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.responses, Config::default().responses);
        assert_eq!(config.queries, Config::default().queries);
    }

    #[test]
    fn test_config_validate_rejects_zero_capacity() {
        let config = Config {
            queries: StoreConfig::new(0, Duration::from_secs(60)),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_store_names() {
        let names: Vec<&str> = Config::default().stores().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec![RESPONSES_STORE, QUERIES_STORE]);
    }
}
