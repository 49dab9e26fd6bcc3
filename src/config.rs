//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::DEFAULT_STALENESS_HOURS;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Path of the SQLite database holding cached users
    pub database_path: String,
    /// Base URL of the user lookup API
    pub lookup_base_url: String,
    /// Bearer token sent to the user lookup API
    pub lookup_bearer_token: String,
    /// Request timeout for the user lookup API in seconds
    pub lookup_timeout: u64,
    /// Age in hours after which a cached user is refreshed
    pub staleness_hours: i64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DATABASE_PATH` - SQLite database file (default: profile_cache.db)
    /// - `LOOKUP_BASE_URL` - Lookup API base URL (default: https://api.twitter.com)
    /// - `LOOKUP_BEARER_TOKEN` - Lookup API bearer token (default: empty)
    /// - `LOOKUP_TIMEOUT` - Lookup request timeout in seconds (default: 30)
    /// - `STALENESS_HOURS` - Cache age that triggers a refresh (default: 24)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            database_path: env::var("DATABASE_PATH").unwrap_or(defaults.database_path),
            lookup_base_url: env::var("LOOKUP_BASE_URL").unwrap_or(defaults.lookup_base_url),
            lookup_bearer_token: env::var("LOOKUP_BEARER_TOKEN")
                .unwrap_or(defaults.lookup_bearer_token),
            lookup_timeout: parse_var("LOOKUP_TIMEOUT").unwrap_or(defaults.lookup_timeout),
            staleness_hours: parse_var("STALENESS_HOURS").unwrap_or(defaults.staleness_hours),
        }
    }

    /// Returns the staleness threshold as a duration.
    pub fn staleness_threshold(&self) -> chrono::Duration {
        chrono::Duration::hours(self.staleness_hours)
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            database_path: "profile_cache.db".to_string(),
            lookup_base_url: "https://api.twitter.com".to_string(),
            lookup_bearer_token: String::new(),
            lookup_timeout: 30,
            staleness_hours: DEFAULT_STALENESS_HOURS,
        }
    }
}
