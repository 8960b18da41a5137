//! Account records and their identifiers.
use chrono::{DateTime, Utc};
use linkhub_common::AccountView;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Immutable, system-assigned account identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for AccountId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Public alias of an account, unique across live accounts
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortId(String);

impl ShortId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored account record.
///
/// Carries the password hash, so it only ever crosses the store boundary.
/// Anything leaving the process goes through [`AccountSnapshot`] or [`AccountView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub short_id: ShortId,
    #[serde(default)]
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Copy of the account without credential material
    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            id: self.id,
            email: self.email.clone(),
            username: self.username.clone(),
            short_id: self.short_id.clone(),
            profile_picture: self.profile_picture.clone(),
            created_at: self.created_at,
        }
    }

    /// Public profile view, without the email
    pub fn public_view(&self) -> AccountView {
        self.snapshot().public_view()
    }
}

/// Account as seen by request handlers: everything but the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSnapshot {
    pub id: AccountId,
    pub email: String,
    pub username: String,
    pub short_id: ShortId,
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AccountSnapshot {
    pub fn public_view(&self) -> AccountView {
        AccountView {
            id: self.id.to_string(),
            username: self.username.clone(),
            short_id: self.short_id.to_string(),
            email: None,
            profile_picture: self.profile_picture.clone(),
        }
    }

    /// View for the account owner, including the email
    pub fn owner_view(&self) -> AccountView {
        AccountView {
            email: Some(self.email.clone()),
            ..self.public_view()
        }
    }
}
