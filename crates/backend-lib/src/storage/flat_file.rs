//! Flat-file account store: an in-memory index persisted as a JSON snapshot.
use super::{AccountStore, MemoryAccountStore, StoreError};
use crate::accounts::{Account, AccountId};
use async_trait::async_trait;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs as tokio_fs, sync::Mutex};

const ACCOUNTS_FILE: &str = "accounts.json";

/// Flat-file implementation of [`AccountStore`]
///
/// Every mutation is applied to the index and then written out as a whole
/// snapshot; if the write fails the index is rolled back, so memory and disk
/// never disagree about a committed record.
#[derive(Clone)]
pub struct FlatFileAccountStore {
    root: PathBuf,
    index: MemoryAccountStore,
    write_lock: Arc<Mutex<()>>,
}

impl FlatFileAccountStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;

        let path = root.join(ACCOUNTS_FILE);
        let accounts: Vec<Account> = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            Vec::new()
        };
        let index = MemoryAccountStore::with_accounts(accounts)?;
        tracing::info!(path = %path.display(), accounts = index.len(), "account store loaded");

        Ok(Self {
            root,
            index,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    fn snapshot_path(&self) -> PathBuf {
        self.root.join(ACCOUNTS_FILE)
    }

    /// Write the current index to disk, via a temp file and rename
    async fn persist(&self) -> Result<(), StoreError> {
        let mut accounts = self.index.all();
        accounts.sort_by_key(|a| a.created_at);
        let json = serde_json::to_vec_pretty(&accounts)?;

        let path = self.snapshot_path();
        let tmp = path.with_extension("json.tmp");
        tokio_fs::write(&tmp, json).await?;
        tokio_fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl AccountStore for FlatFileAccountStore {
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        self.index.find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        self.index.find_by_email(email).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        self.index.find_by_username(username).await
    }

    async fn find_by_short_id(&self, short_id: &str) -> Result<Option<Account>, StoreError> {
        self.index.find_by_short_id(short_id).await
    }

    async fn insert(&self, account: Account) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let id = account.id;
        self.index.insert_sync(account)?;
        if let Err(e) = self.persist().await {
            self.index.delete_sync(id);
            return Err(e);
        }
        Ok(())
    }

    async fn update(&self, account: &Account) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let previous = self.index.update_sync(account)?;
        if let Err(e) = self.persist().await {
            self.index.restore(previous);
            return Err(e);
        }
        Ok(())
    }

    async fn delete(&self, id: AccountId) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;
        let Some(removed) = self.index.delete_sync(id) else {
            return Ok(false);
        };
        if let Err(e) = self.persist().await {
            self.index.restore(removed);
            return Err(e);
        }
        Ok(true)
    }
}
