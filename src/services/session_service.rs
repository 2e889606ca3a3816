//! Domain service for credential verification and bearer token sessions.

use serde::Deserialize;

use crate::services::account_service::{Account, AuthError};

/// Login input as submitted by the client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.username.is_empty() {
            errors.push("Username required".to_string());
        }
        if self.password.is_empty() {
            errors.push("Password required".to_string());
        }
        errors
    }
}

/// Domain service trait for sessions backed by the account's bearer token.
#[async_trait::async_trait]
pub trait SessionVerifier: Send + Sync {
    /// Verifies credentials and rotates the account's token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] for an unknown user and for
    /// a wrong password alike.
    async fn login(&self, credentials: Credentials) -> Result<Account, AuthError>;

    /// The account currently holding `token`, if any.
    async fn find_account_by_token(&self, token: &str) -> Result<Option<Account>, AuthError>;

    /// Resolves an `Authorization` header value to its account.
    async fn lookup_by_token(&self, bearer_header: &str) -> Result<Account, AuthError>;

    /// Whether the header carries a token held by some account.
    ///
    /// Malformed headers and store failures count as invalid.
    async fn validate_token(&self, bearer_header: &str) -> bool;
}
