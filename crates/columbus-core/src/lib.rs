//! # Columbus Core
//!
//! Core types shared across the Columbus API crates.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//!
//! # Example
//!
//! ```ignore
//! use columbus_core::AppError;
//!
//! let error = AppError::bad_request(anyhow::anyhow!("identity header is empty"));
//! ```

pub mod errors;

pub use errors::{AppError, ErrorResponse};
