//! User domain models.

use crate::ids::UserId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A principal known to the system.
///
/// Created once, on the first successful resolution of an unseen identity
/// claim. The email is unique and equals the claim that created the record.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    /// Identity provider that vouched for the claim.
    pub provider: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Input for creating a user from an identity claim.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Validate)]
pub struct NewUser {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub provider: String,
}

impl NewUser {
    pub fn new(email: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            provider: provider.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_validation() {
        assert!(NewUser::new("user@example.com", "shield").validate().is_ok());
        assert!(NewUser::new("", "shield").validate().is_err());
        assert!(NewUser::new("user@example.com", "").validate().is_err());
    }
}
