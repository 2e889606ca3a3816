//! `AccountService` implementation over an injected `AccountStore`.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::task;
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::db::{AccountStore, NewAccount, StoreError};
use crate::services::account_service::{Account, AccountService, AuthError, Registration};
use crate::services::credentials::{generate_token, hash_password};

pub struct DefaultAccountService {
    store: Arc<dyn AccountStore>,
    security: SecurityConfig,
}

impl DefaultAccountService {
    #[must_use]
    pub fn new(store: Arc<dyn AccountStore>, security: SecurityConfig) -> Self {
        Self { store, security }
    }
}

#[async_trait]
impl AccountService for DefaultAccountService {
    async fn register(&self, registration: Registration) -> Result<Account, AuthError> {
        let errors = registration.validation_errors();
        if !errors.is_empty() {
            return Err(AuthError::Validation(errors));
        }

        let Registration {
            username,
            password,
            full_name,
            email,
        } = registration;

        let config = self.security.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, &config))
            .await
            .map_err(|e| AuthError::Internal(format!("Password hashing task failed: {e}")))??;

        let token = generate_token(self.security.token_bytes);
        let full_name = (!full_name.is_empty()).then_some(full_name);

        let id = self
            .store
            .insert_account(NewAccount {
                username: username.clone(),
                full_name: full_name.clone(),
                email: email.clone(),
                password_hash,
                token: token.clone(),
            })
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(detail) => {
                    warn!(username = %username, "Registration rejected: {detail}");
                    AuthError::UsernameTaken
                }
                other => other.into(),
            })?;

        metrics::counter!("auth_registrations_total").increment(1);
        info!(account_id = id, username = %username, "Account registered");

        Ok(Account {
            id,
            username,
            full_name,
            email,
            is_disabled: false,
            token: Some(token),
        })
    }
}
