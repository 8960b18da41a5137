use crate::access::Identity;
use crate::accounts::Account;
use crate::error::AppError;
use async_trait::async_trait;
use axum::http::HeaderMap;
use zeroize::Zeroizing;

use super::AuthToken;

/// Entry points the HTTP layer and other collaborators call into.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account with a hashed password and a fresh short id
    async fn register(
        &self,
        email: &str,
        username: &str,
        password: Zeroizing<String>,
    ) -> Result<Account, AppError>;

    /// Exchange credentials for a bearer token
    async fn login(&self, email: &str, password: Zeroizing<String>) -> Result<AuthToken, AppError>;

    /// Resolve the `Authorization: Bearer` header to a live account
    async fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, AppError>;
}
