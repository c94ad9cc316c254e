//! Feature modules.
//!
//! - [`users`]: user store capability, resolve-or-create service, `/users` routes

pub mod users;
