//! In-memory account store.
use super::{AccountStore, StoreError, UniqueField};
use crate::accounts::{Account, AccountId};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Account store kept in process memory.
///
/// All constraint checks and mutations happen under one write lock, so two
/// concurrent inserts with the same email can never both commit.
#[derive(Debug, Clone, Default)]
pub struct MemoryAccountStore {
    accounts: Arc<RwLock<HashMap<AccountId, Account>>>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `accounts`; constraint violations error out
    pub fn with_accounts(accounts: Vec<Account>) -> Result<Self, StoreError> {
        let store = Self::new();
        for account in accounts {
            store.insert_sync(account)?;
        }
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }

    /// Copy of every record, for persistence
    pub(crate) fn all(&self) -> Vec<Account> {
        self.accounts.read().values().cloned().collect()
    }

    fn find_by<F>(&self, predicate: F) -> Option<Account>
    where
        F: Fn(&Account) -> bool,
    {
        self.accounts.read().values().find(|a| predicate(a)).cloned()
    }

    fn conflict(
        accounts: &HashMap<AccountId, Account>,
        candidate: &Account,
    ) -> Option<UniqueField> {
        accounts
            .values()
            .filter(|other| other.id != candidate.id)
            .find_map(|other| {
                if other.email == candidate.email {
                    Some(UniqueField::Email)
                } else if other.username == candidate.username {
                    Some(UniqueField::Username)
                } else if other.short_id == candidate.short_id {
                    Some(UniqueField::ShortId)
                } else {
                    None
                }
            })
    }

    pub(crate) fn insert_sync(&self, account: Account) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write();
        if accounts.contains_key(&account.id) {
            return Err(StoreError::Backend(format!("duplicate account id {}", account.id)));
        }
        if let Some(field) = Self::conflict(&accounts, &account) {
            return Err(StoreError::UniqueViolation(field));
        }
        accounts.insert(account.id, account);
        Ok(())
    }

    /// Returns the record that was replaced
    pub(crate) fn update_sync(&self, account: &Account) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write();
        if !accounts.contains_key(&account.id) {
            return Err(StoreError::Missing);
        }
        if let Some(field) = Self::conflict(&accounts, account) {
            return Err(StoreError::UniqueViolation(field));
        }
        accounts
            .insert(account.id, account.clone())
            .ok_or(StoreError::Missing)
    }

    pub(crate) fn delete_sync(&self, id: AccountId) -> Option<Account> {
        self.accounts.write().remove(&id)
    }

    /// Put back a record removed or replaced by a failed persisted mutation
    pub(crate) fn restore(&self, account: Account) {
        self.accounts.write().insert(account.id, account);
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.find_by(|a| a.email == email))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.find_by(|a| a.username == username))
    }

    async fn find_by_short_id(&self, short_id: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.find_by(|a| a.short_id.as_str() == short_id))
    }

    async fn insert(&self, account: Account) -> Result<(), StoreError> {
        self.insert_sync(account)
    }

    async fn update(&self, account: &Account) -> Result<(), StoreError> {
        self.update_sync(account).map(|_| ())
    }

    async fn delete(&self, id: AccountId) -> Result<bool, StoreError> {
        Ok(self.delete_sync(id).is_some())
    }
}
