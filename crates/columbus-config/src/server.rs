//! Server configuration.
//!
//! # Environment Variables
//!
//! - `SERVER_ADDR`: API listener address (default: `0.0.0.0:8080`)
//! - `METRICS_ADDR`: Prometheus listener address (default: `0.0.0.0:9090`)
//! - `DATABASE_URL`: PostgreSQL connection string; unset selects the in-memory user store
//! - `DATABASE_MAX_CONNECTIONS`: Pool size (default: `5`)

use std::env;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub server_addr: String,
    pub metrics_addr: String,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server_addr: "0.0.0.0:8080".into(),
            metrics_addr: "0.0.0.0:9090".into(),
            database_url: None,
            database_max_connections: 5,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            server_addr: lookup("SERVER_ADDR").unwrap_or(defaults.server_addr),
            metrics_addr: lookup("METRICS_ADDR").unwrap_or(defaults.metrics_addr),
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            database_max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.database_max_connections),
        }
    }
}
