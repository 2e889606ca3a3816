use std::sync::Arc;

use crate::config::Config;
use crate::db::{AccountStore, Store};
use crate::services::{
    AccountService, DefaultAccountService, DefaultSessionVerifier, SessionVerifier,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub account_store: Arc<dyn AccountStore>,

    pub account_service: Arc<dyn AccountService>,

    pub session_verifier: Arc<dyn SessionVerifier>,
}

impl SharedState {
    /// Connect to the configured database and wire the services to it.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Wire the services to an already constructed store.
    #[must_use]
    pub fn with_store(config: Config, account_store: Arc<dyn AccountStore>) -> Self {
        let account_service = Arc::new(DefaultAccountService::new(
            account_store.clone(),
            config.security.clone(),
        ));
        let session_verifier = Arc::new(DefaultSessionVerifier::new(
            account_store.clone(),
            config.security.clone(),
        ));

        Self {
            config: Arc::new(config),
            account_store,
            account_service,
            session_verifier,
        }
    }
}
