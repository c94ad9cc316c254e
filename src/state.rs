use std::sync::Arc;

use columbus_config::{IdentityConfig, ServerConfig};
use columbus_db::{PgPool, init_db_pool, run_migrations};
use tracing::warn;

use crate::middleware::identity::IdentityGate;
use crate::modules::users::{InMemoryUserRepository, PgUserRepository, UserRepository, UserService};

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: Option<PgPool>,
    pub identity: IdentityGate,
}

impl AppState {
    /// Wires the user service and identity gate over `repository`.
    ///
    /// Fails when the configured identity header is not a valid header name.
    pub fn new(
        repository: Arc<dyn UserRepository>,
        identity_config: &IdentityConfig,
    ) -> anyhow::Result<Self> {
        let users = UserService::new(repository, identity_config);
        let identity = IdentityGate::from_config(identity_config, users)?;

        Ok(Self { db: None, identity })
    }
}

/// Builds the state from configuration: PostgreSQL when `DATABASE_URL` is
/// set, otherwise the in-memory store.
pub async fn init_app_state(
    server_config: &ServerConfig,
    identity_config: &IdentityConfig,
) -> anyhow::Result<AppState> {
    match &server_config.database_url {
        Some(database_url) => {
            let db = init_db_pool(database_url, server_config.database_max_connections).await?;
            run_migrations(&db).await?;

            let repository = Arc::new(PgUserRepository::new(db.clone()));
            let mut state = AppState::new(repository, identity_config)?;
            state.db = Some(db);
            Ok(state)
        }
        None => {
            warn!("DATABASE_URL is not set, users are kept in memory and lost on restart");
            AppState::new(Arc::new(InMemoryUserRepository::new()), identity_config)
        }
    }
}
