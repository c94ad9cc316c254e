//! # Columbus Models
//!
//! Domain models for the Columbus API.
//!
//! - [`ids`]: Strongly-typed identifiers
//! - [`users`]: User records and creation input

pub mod ids;
pub mod users;

pub use ids::UserId;
pub use users::{NewUser, User};
