pub mod controller;
pub mod error;
pub mod repository;
pub mod router;
pub mod service;

pub use error::UserError;
pub use repository::{InMemoryUserRepository, PgUserRepository, UserRepository};
pub use service::UserService;
