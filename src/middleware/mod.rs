//! Middleware modules for request processing.
//!
//! - [`identity`]: Identity header resolution and the per-request user context
//!
//! # Identity Flow
//!
//! 1. Client (or the upstream identity provider) sends the claim in the configured header
//! 2. `require_identity` resolves it to an internal user ID, creating the user on first sight
//! 3. The ID is stored in the request extensions as a `UserContext`
//! 4. Handlers read it with the `CurrentUser` extractor
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::identity::CurrentUser;
//!
//! async fn get_profile(CurrentUser(user_id): CurrentUser) -> impl IntoResponse {
//!     // ...
//! }
//! ```

pub mod identity;
