//! The seam between the auth services and the credential store.

use async_trait::async_trait;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use super::repositories::user::{NewAccount, StoredAccount};

/// Errors raised by a credential store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Database error: {0}")]
    Database(DbErr),
}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            return Self::UniqueViolation(detail);
        }
        Self::Database(err)
    }
}

/// Persistence operations the account and session services depend on.
///
/// `Store` implements this over SeaORM; tests substitute in-memory doubles.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a row and return the id the store assigned to it.
    async fn insert_account(&self, account: NewAccount) -> Result<i32, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<StoredAccount>, StoreError>;

    async fn find_by_token(&self, token: &str) -> Result<Option<StoredAccount>, StoreError>;

    async fn update_token(&self, id: i32, token: &str) -> Result<(), StoreError>;

    async fn update_password_hash(&self, id: i32, password_hash: &str) -> Result<(), StoreError>;

    /// Cheap round trip used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}
