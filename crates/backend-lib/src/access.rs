// ============================
// crates/backend-lib/src/access.rs
// ============================
//! Request identity and ownership checks.
//!
//! The guard middleware ([`crate::middleware::require_auth`]) resolves the bearer
//! token and stores an [`Identity`] in the request extensions. Handlers take it as
//! an extractor and call [`ensure_owner`] before touching the store, so a foreign
//! target is refused with the same status whether or not it exists.
use crate::accounts::{Account, AccountId, AccountSnapshot};
use crate::error::AppError;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts, HeaderMap};

/// The authenticated account acting on a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub account: AccountSnapshot,
}

impl Identity {
    pub fn new(account: AccountSnapshot) -> Self {
        Self { account }
    }

    pub fn account_id(&self) -> AccountId {
        self.account.id
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(AppError::Unauthorised)
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively. Anything else, including an empty
/// token, yields `None`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Anything that belongs to exactly one account
pub trait Owned {
    fn owner_id(&self) -> AccountId;
}

impl Owned for AccountId {
    fn owner_id(&self) -> AccountId {
        *self
    }
}

impl Owned for Account {
    fn owner_id(&self) -> AccountId {
        self.id
    }
}

impl Owned for AccountSnapshot {
    fn owner_id(&self) -> AccountId {
        self.id
    }
}

/// Whether `identity` may act on `resource`
pub fn check_ownership<R: Owned + ?Sized>(identity: &Identity, resource: &R) -> bool {
    identity.account_id() == resource.owner_id()
}

/// [`check_ownership`] as a guard: mismatch is [`AppError::Unauthorised`]
pub fn ensure_owner<R: Owned + ?Sized>(identity: &Identity, resource: &R) -> Result<(), AppError> {
    if check_ownership(identity, resource) {
        Ok(())
    } else {
        tracing::debug!(
            actor = %identity.account_id(),
            owner = %resource.owner_id(),
            "ownership mismatch"
        );
        Err(AppError::Unauthorised)
    }
}
