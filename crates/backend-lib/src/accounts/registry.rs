//! Account registry: the only writer of account records.
use super::model::{Account, AccountId, ShortId};
use super::short_id::{RandomShortIdGenerator, ShortIdGenerator};
use crate::error::AppError;
use crate::metrics::{ACCOUNT_DELETED, ACCOUNT_RENAMED, SHORT_ID_COLLISION, SHORT_ID_REGENERATED};
use crate::storage::{AccountStore, AssetStore, StoreError, UniqueField};
use crate::validation::{self, ValidationError};
use chrono::Utc;
use metrics::counter;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Candidates drawn before giving up on finding a free short id
pub const MAX_SHORT_ID_ATTEMPTS: usize = 8;

/// Enforces the account invariants on top of an [`AccountStore`].
///
/// Every uniqueness check here is a pre-check. The store's commit-time
/// constraint decides, and its violations are mapped back to
/// [`AppError::DuplicateEmail`] / [`AppError::DuplicateUsername`].
#[derive(Clone)]
pub struct AccountRegistry {
    store: Arc<dyn AccountStore>,
    assets: Arc<dyn AssetStore>,
    short_ids: Arc<dyn ShortIdGenerator>,
}

impl AccountRegistry {
    pub fn new(store: Arc<dyn AccountStore>, assets: Arc<dyn AssetStore>) -> Self {
        Self {
            store,
            assets,
            short_ids: Arc::new(RandomShortIdGenerator),
        }
    }

    /// Replace the short id source
    pub fn with_short_id_generator(mut self, short_ids: Arc<dyn ShortIdGenerator>) -> Self {
        self.short_ids = short_ids;
        self
    }

    pub async fn is_email_taken(&self, email: &str) -> Result<bool, AppError> {
        let email = email.trim().to_lowercase();
        Ok(self.store.find_by_email(&email).await?.is_some())
    }

    /// Whether an account other than `excluding` holds `username`
    pub async fn is_username_taken(
        &self,
        username: &str,
        excluding: Option<AccountId>,
    ) -> Result<bool, AppError> {
        let holder = self.store.find_by_username(username.trim()).await?;
        Ok(holder.is_some_and(|holder| Some(holder.id) != excluding))
    }

    /// Draw short ids until one is not held by a live account.
    ///
    /// The result is still only a candidate; the commit may lose a race for it.
    pub async fn allocate_short_id(&self) -> Result<ShortId, AppError> {
        for attempt in 1..=MAX_SHORT_ID_ATTEMPTS {
            let candidate = self.short_ids.generate();
            if self.store.find_by_short_id(candidate.as_str()).await?.is_none() {
                return Ok(candidate);
            }
            counter!(SHORT_ID_COLLISION).increment(1);
            debug!(attempt, "short id candidate already taken");
        }
        Err(AppError::Internal(format!(
            "no free short id after {MAX_SHORT_ID_ATTEMPTS} attempts"
        )))
    }

    /// Persist a new account.
    ///
    /// A short id lost to a concurrent commit comes back as
    /// [`AppError::ShortIdCollision`]; callers allocate another and retry.
    #[instrument(skip(self, email, password_hash, short_id), fields(short_id = %short_id))]
    pub async fn create(
        &self,
        email: &str,
        username: &str,
        password_hash: String,
        short_id: ShortId,
    ) -> Result<Account, AppError> {
        let email = validation::validate_email(email)?;
        let username = validation::validate_username(username)?;

        if self.is_email_taken(&email).await? {
            return Err(AppError::DuplicateEmail);
        }
        if self.is_username_taken(&username, None).await? {
            return Err(AppError::DuplicateUsername);
        }

        let account = Account {
            id: AccountId::new(),
            email,
            username,
            password_hash,
            short_id,
            profile_picture: None,
            created_at: Utc::now(),
        };
        self.store
            .insert(account.clone())
            .await
            .map_err(map_commit_error)?;

        info!(account_id = %account.id, "account created");
        Ok(account)
    }

    pub async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, AppError> {
        Ok(self.store.find_by_id(id).await?)
    }

    pub async fn find_by_short_id(&self, short_id: &str) -> Result<Option<Account>, AppError> {
        Ok(self.store.find_by_short_id(short_id).await?)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AppError> {
        Ok(self.store.find_by_username(username.trim()).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AppError> {
        let email = email.trim().to_lowercase();
        Ok(self.store.find_by_email(&email).await?)
    }

    async fn require(&self, id: AccountId) -> Result<Account, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("account {id}")))
    }

    /// Change an account's username. Keeping the current name is a no-op success.
    #[instrument(skip(self))]
    pub async fn rename(&self, id: AccountId, new_username: &str) -> Result<Account, AppError> {
        let new_username = validation::validate_username(new_username)?;
        let mut account = self.require(id).await?;
        if self.is_username_taken(&new_username, Some(id)).await? {
            return Err(AppError::DuplicateUsername);
        }

        if account.username == new_username {
            return Ok(account);
        }
        account.username = new_username;
        self.store.update(&account).await.map_err(map_commit_error)?;

        counter!(ACCOUNT_RENAMED).increment(1);
        info!(account_id = %id, "account renamed");
        Ok(account)
    }

    /// Give an account a fresh short id and return it
    #[instrument(skip(self))]
    pub async fn regenerate_short_id(&self, id: AccountId) -> Result<ShortId, AppError> {
        let mut account = self.require(id).await?;

        for _ in 0..MAX_SHORT_ID_ATTEMPTS {
            account.short_id = self.allocate_short_id().await?;
            match self.store.update(&account).await {
                Ok(()) => {
                    counter!(SHORT_ID_REGENERATED).increment(1);
                    info!(account_id = %id, short_id = %account.short_id, "short id regenerated");
                    return Ok(account.short_id);
                },
                Err(StoreError::UniqueViolation(UniqueField::ShortId)) => {
                    counter!(SHORT_ID_COLLISION).increment(1);
                    continue;
                },
                Err(e) => return Err(map_commit_error(e)),
            }
        }
        Err(AppError::ShortIdCollision)
    }

    /// Replace the account's profile picture.
    ///
    /// The previous asset is deleted before the new one is stored. If the record
    /// cannot be updated afterwards, the new asset is removed again.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn set_profile_picture(
        &self,
        id: AccountId,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<Account, AppError> {
        if bytes.is_empty() {
            return Err(ValidationError::EmptyImage.into());
        }
        let extension = validation::image_extension(content_type)?;
        let mut account = self.require(id).await?;

        if let Some(old_key) = account.profile_picture.take() {
            self.assets.delete(&old_key).await?;
            // The old blob is gone; don't leave the record pointing at it
            self.store.update(&account).await.map_err(map_commit_error)?;
        }

        let key = format!("{id}/{}.{extension}", uuid::Uuid::new_v4());
        let stored_key = self.assets.put(&key, bytes, content_type).await?;

        account.profile_picture = Some(stored_key.clone());
        if let Err(e) = self.store.update(&account).await {
            if let Err(cleanup) = self.assets.delete(&stored_key).await {
                warn!(key = %stored_key, error = %cleanup, "orphaned profile picture");
            }
            return Err(map_commit_error(e));
        }

        info!(account_id = %id, key = %stored_key, "profile picture replaced");
        Ok(account)
    }

    /// Delete an account and its profile picture.
    ///
    /// The picture goes first; if it cannot be deleted the account is kept.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: AccountId) -> Result<(), AppError> {
        let account = self.require(id).await?;

        if let Some(key) = &account.profile_picture {
            if let Err(e) = self.assets.delete(key).await {
                warn!(account_id = %id, key = %key, error = %e, "profile picture removal failed, keeping account");
                return Err(e.into());
            }
        }

        if !self.store.delete(id).await? {
            return Err(AppError::NotFound(format!("account {id}")));
        }

        counter!(ACCOUNT_DELETED).increment(1);
        info!(account_id = %id, "account deleted");
        Ok(())
    }
}

fn map_commit_error(err: StoreError) -> AppError {
    match err {
        StoreError::UniqueViolation(UniqueField::Email) => AppError::DuplicateEmail,
        StoreError::UniqueViolation(UniqueField::Username) => AppError::DuplicateUsername,
        StoreError::UniqueViolation(UniqueField::ShortId) => AppError::ShortIdCollision,
        StoreError::Missing => AppError::NotFound("account".to_string()),
        other => AppError::Store(other),
    }
}
