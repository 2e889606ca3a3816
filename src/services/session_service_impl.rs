//! `SessionVerifier` implementation over an injected `AccountStore`.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::task;
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::db::{AccountStore, StoredAccount};
use crate::services::account_service::{Account, AuthError};
use crate::services::credentials::{
    extract_bearer_token, generate_token, hash_password, needs_rehash, verify_password,
};
use crate::services::session_service::{Credentials, SessionVerifier};

pub struct DefaultSessionVerifier {
    store: Arc<dyn AccountStore>,
    security: SecurityConfig,
    /// Verified against when the username is unknown, so both rejections
    /// cost one full hash verification.
    decoy_hash: String,
}

impl DefaultSessionVerifier {
    #[must_use]
    pub fn new(store: Arc<dyn AccountStore>, security: SecurityConfig) -> Self {
        let decoy_hash = hash_password(&generate_token(32), &security).unwrap_or_else(|e| {
            warn!("Failed to build decoy password hash: {e}");
            String::new()
        });

        Self {
            store,
            security,
            decoy_hash,
        }
    }

    /// The hash a login attempt is checked against: the account's own, or
    /// the decoy when no account matched.
    fn hash_to_verify<'a>(&'a self, stored: Option<&'a StoredAccount>) -> &'a str {
        stored.map_or(self.decoy_hash.as_str(), |account| {
            account.password_hash.as_str()
        })
    }

    /// Replace a legacy or outdated hash after a successful login.
    /// Failures are logged; the login itself has already succeeded.
    async fn upgrade_password_hash(&self, account: &StoredAccount, password: String) {
        let config = self.security.clone();
        let rehashed = task::spawn_blocking(move || hash_password(&password, &config)).await;

        let new_hash = match rehashed {
            Ok(Ok(hash)) => hash,
            Ok(Err(e)) => {
                warn!(account_id = account.id, "Password rehash failed: {e}");
                return;
            }
            Err(e) => {
                warn!(account_id = account.id, "Password rehash task failed: {e}");
                return;
            }
        };

        match self.store.update_password_hash(account.id, &new_hash).await {
            Ok(()) => info!(account_id = account.id, "Password hash upgraded"),
            Err(e) => warn!(account_id = account.id, "Failed to store upgraded hash: {e}"),
        }
    }
}

#[async_trait]
impl SessionVerifier for DefaultSessionVerifier {
    async fn login(&self, credentials: Credentials) -> Result<Account, AuthError> {
        let errors = credentials.validation_errors();
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        let Credentials { username, password } = credentials;

        let found = self.store.find_by_username(&username).await?;

        let checked_hash = self.hash_to_verify(found.as_ref()).to_owned();
        let candidate = password.clone();
        let is_valid = task::spawn_blocking(move || verify_password(&candidate, &checked_hash))
            .await
            .map_err(|e| AuthError::Internal(format!("Password verification task failed: {e}")))?;

        let Some(stored) = found.filter(|_| is_valid) else {
            metrics::counter!("auth_logins_total", "outcome" => "rejected").increment(1);
            warn!(username = %username, "Failed login attempt");
            return Err(AuthError::InvalidCredentials);
        };

        let token = generate_token(self.security.token_bytes);
        self.store.update_token(stored.id, &token).await?;

        if self.security.auto_migrate_password_hashes
            && needs_rehash(&stored.password_hash, &self.security)
        {
            self.upgrade_password_hash(&stored, password).await;
        }

        metrics::counter!("auth_logins_total", "outcome" => "success").increment(1);
        info!(account_id = stored.id, username = %username, "Successful login");

        let mut account = Account::from(stored);
        account.token = Some(token);
        Ok(account)
    }

    async fn find_account_by_token(&self, token: &str) -> Result<Option<Account>, AuthError> {
        let stored = self.store.find_by_token(token).await?;
        Ok(stored.map(Account::from))
    }

    async fn lookup_by_token(&self, bearer_header: &str) -> Result<Account, AuthError> {
        let token = extract_bearer_token(bearer_header)?;
        self.find_account_by_token(token)
            .await?
            .ok_or(AuthError::UnknownToken)
    }

    async fn validate_token(&self, bearer_header: &str) -> bool {
        let Ok(token) = extract_bearer_token(bearer_header) else {
            return false;
        };

        match self.find_account_by_token(token).await {
            Ok(account) => account.is_some(),
            Err(e) => {
                warn!("Token validation failed: {e}");
                false
            }
        }
    }
}
