//! Strongly-typed ID newtypes for domain entities.
//!
//! User identifiers are generated by the user store and handed out as opaque
//! strings, so the newtype wraps a `String` rather than a `Uuid`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Internal identifier of a user record. Immutable once assigned.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct UserId(String);

impl UserId {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_plain_string() {
        let id = UserId::from("user-id");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"user-id\"");

        let parsed: UserId = serde_json::from_str("\"user-id\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_display() {
        assert_eq!(UserId::from("abc").to_string(), "abc");
    }
}
