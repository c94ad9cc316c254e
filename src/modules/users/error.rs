use thiserror::Error;

/// Errors reported by a user store.
///
/// `NotFound` is the only variant the user service interprets; everything
/// else is passed through to the caller untouched.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found")]
    NotFound,

    #[error("user already exists")]
    Duplicate,

    #[error("invalid user: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl UserError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
