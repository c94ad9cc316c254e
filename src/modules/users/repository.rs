//! User store capability and its implementations.
//!
//! The store is the authority for uniqueness: two concurrent creations of the
//! same email must leave exactly one record and fail the other with
//! [`UserError::Duplicate`].

use async_trait::async_trait;
use chrono::Utc;
use columbus_models::{NewUser, User, UserId};
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use super::error::UserError;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Looks up the identifier of the user with this email and provider.
    ///
    /// Returns [`UserError::NotFound`] when no such user exists.
    async fn get_id(&self, email: &str, provider: &str) -> Result<UserId, UserError>;

    /// Inserts a new user and returns its generated identifier.
    ///
    /// Returns [`UserError::Duplicate`] when the email is already taken.
    async fn create(&self, new_user: NewUser) -> Result<UserId, UserError>;
}

/// PostgreSQL-backed store over the `users` table.
#[derive(Clone, Debug)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip_all, fields(db.operation = "SELECT"))]
    async fn get_id(&self, email: &str, provider: &str) -> Result<UserId, UserError> {
        let id = sqlx::query_scalar::<_, String>(
            r#"
            SELECT id::text
            FROM users
            WHERE email = $1 AND provider = $2
            "#,
        )
        .bind(email)
        .bind(provider)
        .fetch_optional(&self.db)
        .await?
        .ok_or(UserError::NotFound)?;

        Ok(UserId::from(id))
    }

    #[instrument(skip_all, fields(db.operation = "INSERT"))]
    async fn create(&self, new_user: NewUser) -> Result<UserId, UserError> {
        new_user.validate()?;

        let id = sqlx::query_scalar::<_, String>(
            r#"
            INSERT INTO users (email, provider)
            VALUES ($1, $2)
            RETURNING id::text
            "#,
        )
        .bind(&new_user.email)
        .bind(&new_user.provider)
        .fetch_one(&self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                UserError::Duplicate
            }
            other => UserError::Database(other),
        })?;

        Ok(UserId::from(id))
    }
}

/// Process-local store keyed by email.
///
/// Used when no database is configured and as a deterministic store in tests.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        self.users.read().await.get(email).cloned()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_id(&self, email: &str, provider: &str) -> Result<UserId, UserError> {
        self.users
            .read()
            .await
            .get(email)
            .filter(|user| user.provider == provider)
            .map(|user| user.id.clone())
            .ok_or(UserError::NotFound)
    }

    async fn create(&self, new_user: NewUser) -> Result<UserId, UserError> {
        new_user.validate()?;

        let mut users = self.users.write().await;
        if users.contains_key(&new_user.email) {
            return Err(UserError::Duplicate);
        }

        let now = Utc::now();
        let user = User {
            id: UserId::from(Uuid::new_v4().to_string()),
            email: new_user.email,
            provider: new_user.provider,
            created_at: now,
            updated_at: now,
        };
        let id = user.id.clone();
        users.insert(user.email.clone(), user);

        Ok(id)
    }
}
