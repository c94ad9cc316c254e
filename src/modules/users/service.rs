use columbus_config::IdentityConfig;
use columbus_models::{NewUser, UserId};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::error::UserError;
use super::repository::UserRepository;
use crate::metrics::{track_identity_resolution, track_user_created};

/// Resolve-or-create over a user store.
///
/// Every user created through this service is recorded with the provider
/// name fixed at construction.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    provider: String,
}

impl fmt::Debug for UserService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserService")
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, config: &IdentityConfig) -> Self {
        Self {
            repository,
            provider: config.provider_default_name.clone(),
        }
    }

    /// Returns the identifier of the user owning `email`, creating the user
    /// if the store has never seen it.
    ///
    /// Only [`UserError::NotFound`] from the lookup leads to a create. Any
    /// other lookup error, and any create error including a lost race
    /// ([`UserError::Duplicate`]), is returned as is without retrying.
    /// Failures are counted here and logged by the caller.
    #[instrument(skip_all, fields(provider = %self.provider))]
    pub async fn resolve_or_create(&self, email: &str) -> Result<UserId, UserError> {
        match self.repository.get_id(email, &self.provider).await {
            Ok(id) => {
                debug!("Resolved existing user");
                track_identity_resolution("found");
                Ok(id)
            }
            Err(UserError::NotFound) => self.create(email).await,
            Err(err) => {
                track_identity_resolution("failed");
                Err(err)
            }
        }
    }

    async fn create(&self, email: &str) -> Result<UserId, UserError> {
        match self
            .repository
            .create(NewUser::new(email, self.provider.as_str()))
            .await
        {
            Ok(id) => {
                info!("Created user on first sight");
                track_identity_resolution("created");
                track_user_created(&self.provider);
                Ok(id)
            }
            Err(err) => {
                track_identity_resolution("failed");
                Err(err)
            }
        }
    }
}
