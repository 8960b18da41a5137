// ============================
// crates/backend-lib/src/storage/mod.rs
// ============================
//! Storage ports for accounts and profile assets, with in-memory and flat-file
//! implementations.
use crate::accounts::{Account, AccountId};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

mod assets;
mod flat_file;
mod memory;

pub use assets::{FlatFileAssetStore, MemoryAssetStore};
pub use flat_file::FlatFileAccountStore;
pub use memory::MemoryAccountStore;

/// Account field carrying a uniqueness constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Email,
    Username,
    ShortId,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueField::Email => f.write_str("email"),
            UniqueField::Username => f.write_str("username"),
            UniqueField::ShortId => f.write_str("short_id"),
        }
    }
}

/// Failures reported by a store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Commit rejected because another live account holds the value
    #[error("unique constraint violated on {0}")]
    UniqueViolation(UniqueField),

    #[error("record not found")]
    Missing,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("backend failure: {0}")]
    Backend(String),
}

/// Persistent account store.
///
/// Implementations must enforce uniqueness of email, username and short id
/// atomically on [`insert`](AccountStore::insert) and
/// [`update`](AccountStore::update); that check is the source of truth, any
/// lookup done beforehand is only a fast path.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;

    async fn find_by_short_id(&self, short_id: &str) -> Result<Option<Account>, StoreError>;

    /// Insert a new account
    async fn insert(&self, account: Account) -> Result<(), StoreError>;

    /// Replace the stored record with the same id. `Missing` if there is none.
    async fn update(&self, account: &Account) -> Result<(), StoreError>;

    /// Remove an account, returning whether it existed
    async fn delete(&self, id: AccountId) -> Result<bool, StoreError>;
}

/// Blob store for profile pictures
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store `bytes` under `key` and return the key to persist
    async fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<String, StoreError>;

    /// Remove the blob under `key`. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}
