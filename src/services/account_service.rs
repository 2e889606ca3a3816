//! Domain service for account registration.
//!
//! Also owns the error type and the public account representation shared
//! with the session verifier.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{StoreError, StoredAccount};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// One message per violated constraint, in field order.
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Username or password incorrect")]
    InvalidCredentials,

    #[error("Token required")]
    MissingToken,

    #[error("Invalid format")]
    TokenFormat,

    #[error("Invalid token")]
    UnknownToken,

    #[error("Username already taken")]
    UsernameTaken,

    #[error("Store error: {0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// An account as exposed to clients. Carries no password material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i32,
    pub username: String,
    #[serde(rename = "fullname", skip_serializing_if = "Option::is_none", default)]
    pub full_name: Option<String>,
    pub email: String,
    pub is_disabled: bool,
    pub token: Option<String>,
}

impl From<StoredAccount> for Account {
    fn from(stored: StoredAccount) -> Self {
        Self {
            id: stored.id,
            username: stored.username,
            full_name: stored.full_name,
            email: stored.email,
            is_disabled: stored.is_disabled,
            token: stored.token,
        }
    }
}

/// Registration input as submitted by the client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Registration {
    pub username: String,
    pub password: String,
    #[serde(rename = "fullname")]
    pub full_name: String,
    pub email: String,
}

impl Registration {
    /// Every violated constraint, not just the first.
    #[must_use]
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.username.is_empty() {
            errors.push("Username required".to_string());
        }
        if self.password.is_empty() {
            errors.push("Password required".to_string());
        }
        if self.email.is_empty() {
            errors.push("Email required".to_string());
        }
        errors
    }
}

/// Domain service trait for account creation.
#[async_trait::async_trait]
pub trait AccountService: Send + Sync {
    /// Validates input, hashes the password, stores the account and issues
    /// its first token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] listing every missing field, and
    /// performs no write in that case.
    async fn register(&self, registration: Registration) -> Result<Account, AuthError>;
}
