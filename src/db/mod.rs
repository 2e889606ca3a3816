use anyhow::{Context, Result};
use async_trait::async_trait;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

mod account_store;
pub mod migrator;
pub mod repositories;

pub use account_store::{AccountStore, StoreError};
pub use repositories::user::{NewAccount, StoredAccount};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if let Some(path_str) = sqlite_file_path(db_url) {
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file: {path_str}"))?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt)
            .await
            .context("Failed to connect to database")?;

        migrator::Migrator::up(&conn, None)
            .await
            .context("Failed to apply migrations")?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }
}

/// Filesystem path of a file-backed SQLite URL, `None` for in-memory or
/// non-SQLite databases.
fn sqlite_file_path(db_url: &str) -> Option<&str> {
    let path = db_url.strip_prefix("sqlite:")?;
    let path = path.strip_prefix("//").unwrap_or(path);
    let path = path.split('?').next().unwrap_or(path);

    if path.is_empty() || path.contains(":memory:") || db_url.contains("mode=memory") {
        return None;
    }
    Some(path)
}

#[async_trait]
impl AccountStore for Store {
    async fn insert_account(&self, account: NewAccount) -> Result<i32, StoreError> {
        self.user_repo().insert(account).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<StoredAccount>, StoreError> {
        self.user_repo().get_by_username(username).await
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<StoredAccount>, StoreError> {
        self.user_repo().get_by_token(token).await
    }

    async fn update_token(&self, id: i32, token: &str) -> Result<(), StoreError> {
        self.user_repo().update_token(id, token).await
    }

    async fn update_password_hash(&self, id: i32, password_hash: &str) -> Result<(), StoreError> {
        self.user_repo().update_password_hash(id, password_hash).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }
}
