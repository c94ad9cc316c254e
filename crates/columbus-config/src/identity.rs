//! Identity configuration.
//!
//! Tells the identity middleware which request header carries the identity
//! claim and which identity provider is recorded on users created from it.
//!
//! # Environment Variables
//!
//! - `IDENTITY_HEADER`: Header carrying the identity claim (default: `Columbus-User-ID`)
//! - `IDENTITY_PROVIDER_DEFAULT_NAME`: Provider name stored on new users (default: `shield`)

use std::env;

pub const DEFAULT_IDENTITY_HEADER: &str = "Columbus-User-ID";
pub const DEFAULT_PROVIDER_NAME: &str = "shield";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Immutable identity settings, injected into the middleware and the user
/// service at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdentityConfig {
    /// Name of the header carrying the identity claim.
    pub header_key: String,

    /// Identity provider recorded on every user created from a claim.
    pub provider_default_name: String,
}

impl IdentityConfig {
    /// Builds a config, rejecting empty values.
    pub fn new(
        header_key: impl Into<String>,
        provider_default_name: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let header_key = header_key.into();
        let provider_default_name = provider_default_name.into();

        if header_key.is_empty() {
            return Err(ConfigError::Empty("IDENTITY_HEADER"));
        }
        if provider_default_name.is_empty() {
            return Err(ConfigError::Empty("IDENTITY_PROVIDER_DEFAULT_NAME"));
        }

        Ok(Self {
            header_key,
            provider_default_name,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to the defaults; variables set to an empty
    /// string are rejected.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`IdentityConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::new(
            lookup("IDENTITY_HEADER").unwrap_or_else(|| DEFAULT_IDENTITY_HEADER.into()),
            lookup("IDENTITY_PROVIDER_DEFAULT_NAME")
                .unwrap_or_else(|| DEFAULT_PROVIDER_NAME.into()),
        )
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            header_key: DEFAULT_IDENTITY_HEADER.into(),
            provider_default_name: DEFAULT_PROVIDER_NAME.into(),
        }
    }
}
