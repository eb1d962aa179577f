/// Shared application state
use crate::{
    config::ServerConfig,
    error::Result,
    services::{AccountService, PasswordHasher, TokenService},
};
use gatehouse_storage::Database;
use std::sync::Arc;

/// Application state shared across all handlers
///
/// Everything here is immutable after startup; the connection pool inside
/// `db` is the only shared resource with interior state.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub accounts: Arc<AccountService>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(
        db: Arc<Database>,
        accounts: Arc<AccountService>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            db,
            accounts,
            tokens,
        }
    }

    /// Wire services from configuration
    pub fn from_config(config: &ServerConfig, db: Arc<Database>) -> Result<Self> {
        let hasher = PasswordHasher::new(config.auth.bcrypt_cost);
        let accounts = AccountService::new(db.clone(), hasher)?;
        let tokens = TokenService::from_settings(&config.auth);

        Ok(Self::new(db, Arc::new(accounts), Arc::new(tokens)))
    }
}
