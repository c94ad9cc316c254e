//! # Columbus Config
//!
//! Configuration types for the Columbus API.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`identity`]: Identity header and default identity provider
//! - [`server`]: Listener addresses and database settings
//!
//! # Example
//!
//! ```ignore
//! use columbus_config::{IdentityConfig, ServerConfig};
//!
//! let identity_config = IdentityConfig::from_env()?;
//! let server_config = ServerConfig::from_env();
//! ```

pub mod identity;
pub mod server;

pub use identity::{ConfigError, IdentityConfig};
pub use server::ServerConfig;
