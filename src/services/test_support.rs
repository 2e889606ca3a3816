//! In-memory `AccountStore` doubles for service tests.

use async_trait::async_trait;
use sea_orm::DbErr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::config::SecurityConfig;
use crate::db::{AccountStore, NewAccount, StoreError, StoredAccount};

/// Cheap Argon2 parameters so tests don't spend seconds hashing.
pub fn fast_security() -> SecurityConfig {
    SecurityConfig {
        argon2_memory_cost_kib: 1024,
        argon2_time_cost: 1,
        argon2_parallelism: 1,
        ..SecurityConfig::default()
    }
}

#[derive(Default)]
pub struct MemoryAccountStore {
    rows: Mutex<Vec<StoredAccount>>,
    writes: AtomicUsize,
    token_writes_fail: AtomicBool,
}

impl MemoryAccountStore {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every later `update_token` call fail.
    pub fn fail_token_writes(&self) {
        self.token_writes_fail.store(true, Ordering::SeqCst);
    }

    pub fn row(&self, username: &str) -> Option<StoredAccount> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.username == username)
            .cloned()
    }

    /// Insert a row directly, bypassing the services.
    pub fn seed(&self, username: &str, password_hash: &str, token: &str) -> i32 {
        let mut rows = self.rows.lock().unwrap();
        let id = i32::try_from(rows.len()).unwrap() + 1;
        rows.push(StoredAccount {
            id,
            username: username.to_string(),
            full_name: None,
            email: format!("{username}@example.com"),
            password_hash: password_hash.to_string(),
            is_disabled: false,
            token: Some(token.to_string()),
        });
        id
    }

    fn update(&self, id: i32, apply: impl FnOnce(&mut StoredAccount)) {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if let Some(row) = self.rows.lock().unwrap().iter_mut().find(|row| row.id == id) {
            apply(row);
        }
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn insert_account(&self, account: NewAccount) -> Result<i32, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|row| row.username == account.username) {
            return Err(StoreError::UniqueViolation("users.username".to_string()));
        }

        let id = i32::try_from(rows.len()).unwrap() + 1;
        rows.push(StoredAccount {
            id,
            username: account.username,
            full_name: account.full_name,
            email: account.email,
            password_hash: account.password_hash,
            is_disabled: false,
            token: Some(account.token),
        });
        Ok(id)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<StoredAccount>, StoreError> {
        Ok(self.row(username))
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<StoredAccount>, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.token.as_deref() == Some(token))
            .cloned())
    }

    async fn update_token(&self, id: i32, token: &str) -> Result<(), StoreError> {
        if self.token_writes_fail.load(Ordering::SeqCst) {
            return Err(StoreError::Database(DbErr::Custom("token write refused".to_string())));
        }
        self.update(id, |row| row.token = Some(token.to_string()));
        Ok(())
    }

    async fn update_password_hash(&self, id: i32, password_hash: &str) -> Result<(), StoreError> {
        self.update(id, |row| row.password_hash = password_hash.to_string());
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// A store whose every call fails, counting how often it was reached.
#[derive(Default)]
pub struct FailingStore {
    pub calls: AtomicUsize,
}

impl FailingStore {
    fn fail<T>(&self) -> Result<T, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Database(DbErr::Custom("connection refused".to_string())))
    }
}

#[async_trait]
impl AccountStore for FailingStore {
    async fn insert_account(&self, _account: NewAccount) -> Result<i32, StoreError> {
        self.fail()
    }

    async fn find_by_username(&self, _username: &str) -> Result<Option<StoredAccount>, StoreError> {
        self.fail()
    }

    async fn find_by_token(&self, _token: &str) -> Result<Option<StoredAccount>, StoreError> {
        self.fail()
    }

    async fn update_token(&self, _id: i32, _token: &str) -> Result<(), StoreError> {
        self.fail()
    }

    async fn update_password_hash(&self, _id: i32, _hash: &str) -> Result<(), StoreError> {
        self.fail()
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.fail()
    }
}
