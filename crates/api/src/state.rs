use std::sync::Arc;

use marches_auth::{AdminClient, GoTrueClient};
use marches_core::error::CoreError;
use marches_core::provisioning::AuthAccounts;
use marches_core::role_resolver::RoleResolver;
use marches_core::session::UNCONFIGURED_MESSAGE;
use marches_db::profiles::PgProfileLookup;

use crate::config::ServerConfig;

/// Shown when user administration is attempted without the service-role key.
pub const ADMIN_UNCONFIGURED_MESSAGE: &str =
    "Gestion des utilisateurs indisponible : définissez SUPABASE_SERVICE_ROLE_KEY.";

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; every field is behind an `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: marches_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Effective-role resolution over the profile table.
    pub resolver: RoleResolver,
    /// Public auth endpoints. `None` when the backend is unconfigured.
    pub auth: Option<GoTrueClient>,
    /// Privileged account management. `None` without the service-role key.
    pub accounts: Option<Arc<dyn AuthAccounts>>,
}

impl AppState {
    /// Wire the production collaborators from configuration.
    pub fn new(pool: marches_db::DbPool, config: ServerConfig) -> Self {
        let resolver = RoleResolver::new(Some(Arc::new(PgProfileLookup::new(pool.clone()))));
        let auth = GoTrueClient::from_config(&config.backend);
        let accounts = AdminClient::from_config(&config.backend)
            .map(|client| Arc::new(client) as Arc<dyn AuthAccounts>);

        if auth.is_none() {
            tracing::warn!("Hosted backend is not configured; auth endpoints will answer 503");
        }

        Self {
            pool,
            config: Arc::new(config),
            resolver,
            auth,
            accounts,
        }
    }

    pub fn auth_client(&self) -> Result<&GoTrueClient, CoreError> {
        self.auth
            .as_ref()
            .ok_or_else(|| CoreError::Unconfigured(UNCONFIGURED_MESSAGE.into()))
    }

    pub fn accounts(&self) -> Result<Arc<dyn AuthAccounts>, CoreError> {
        self.accounts
            .clone()
            .ok_or_else(|| CoreError::Unconfigured(ADMIN_UNCONFIGURED_MESSAGE.into()))
    }
}
