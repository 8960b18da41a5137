use crate::access::{bearer_token, Identity};
use crate::accounts::{Account, AccountRegistry};
use crate::auth::{AuthService, AuthToken, PasswordRequirements, PasswordVault, TokenService};
use crate::error::AppError;
use crate::metrics::{ACCOUNT_REGISTERED, AUTH_REJECTED, LOGIN_ATTEMPT};
use crate::validation;
use async_trait::async_trait;
use axum::http::HeaderMap;
use metrics::counter;
use tracing::{debug, info, instrument, warn};
use zeroize::Zeroizing;

/// Commit attempts before registration gives up on short id races
const MAX_REGISTER_ATTEMPTS: usize = 3;

/// Registry, vault and token service wired into the register/login/guard flows.
#[derive(Clone)]
pub struct DefaultAuth {
    registry: AccountRegistry,
    vault: PasswordVault,
    tokens: TokenService,
    requirements: PasswordRequirements,
}

impl DefaultAuth {
    pub fn new(
        registry: AccountRegistry,
        vault: PasswordVault,
        tokens: TokenService,
        requirements: PasswordRequirements,
    ) -> Self {
        Self {
            registry,
            vault,
            tokens,
            requirements,
        }
    }

    pub fn registry(&self) -> &AccountRegistry {
        &self.registry
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    async fn hash_password(&self, password: Zeroizing<String>) -> Result<String, AppError> {
        let vault = self.vault;
        let hash = tokio::task::spawn_blocking(move || vault.hash_secure(password)).await??;
        Ok(hash)
    }

    async fn verify_password(&self, password: Zeroizing<String>, hash: String) -> Result<bool, AppError> {
        let vault = self.vault;
        let matches = tokio::task::spawn_blocking(move || vault.verify(password.as_str(), &hash)).await?;
        Ok(matches)
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    #[instrument(skip_all)]
    async fn register(
        &self,
        email: &str,
        username: &str,
        password: Zeroizing<String>,
    ) -> Result<Account, AppError> {
        let email = validation::validate_email(email)?;
        let username = validation::validate_username(username)?;
        validation::validate_password(password.as_str(), &self.requirements)?;

        // Fail fast before paying for the hash; create() checks again
        if self.registry.is_email_taken(&email).await? {
            return Err(AppError::DuplicateEmail);
        }
        if self.registry.is_username_taken(&username, None).await? {
            return Err(AppError::DuplicateUsername);
        }

        let password_hash = self.hash_password(password).await?;

        for attempt in 1..=MAX_REGISTER_ATTEMPTS {
            let short_id = self.registry.allocate_short_id().await?;
            match self
                .registry
                .create(&email, &username, password_hash.clone(), short_id)
                .await
            {
                Ok(account) => {
                    counter!(ACCOUNT_REGISTERED).increment(1);
                    info!(account_id = %account.id, "account registered");
                    return Ok(account);
                },
                Err(AppError::ShortIdCollision) => {
                    warn!(attempt, "short id taken at commit, retrying");
                },
                Err(e) => return Err(e),
            }
        }

        Err(AppError::ShortIdCollision)
    }

    #[instrument(skip_all)]
    async fn login(&self, email: &str, password: Zeroizing<String>) -> Result<AuthToken, AppError> {
        let Some(account) = self.registry.find_by_email(email).await? else {
            counter!(LOGIN_ATTEMPT, "outcome" => "not_found").increment(1);
            return Err(AppError::NotFound("User not found".to_string()));
        };

        if !self.verify_password(password, account.password_hash.clone()).await? {
            counter!(LOGIN_ATTEMPT, "outcome" => "bad_password").increment(1);
            debug!(account_id = %account.id, "password mismatch");
            return Err(AppError::InvalidCredential);
        }

        let token = self.tokens.issue(account.id)?;
        counter!(LOGIN_ATTEMPT, "outcome" => "ok").increment(1);
        info!(account_id = %account.id, expires_at = %token.expires_at, "token issued");
        Ok(token)
    }

    async fn authenticate(&self, headers: &HeaderMap) -> Result<Identity, AppError> {
        let Some(token) = bearer_token(headers) else {
            counter!(AUTH_REJECTED).increment(1);
            debug!("missing or malformed authorization header");
            return Err(AppError::Unauthorised);
        };

        let subject = match self.tokens.verify(token) {
            Ok(subject) => subject,
            Err(e) => {
                counter!(AUTH_REJECTED).increment(1);
                debug!(reason = %e.reason(), "token rejected");
                return Err(e.into());
            },
        };

        match self.registry.find_by_id(subject).await? {
            Some(account) => Ok(Identity::new(account.snapshot())),
            None => {
                counter!(AUTH_REJECTED).increment(1);
                debug!(account_id = %subject, "token subject no longer exists");
                Err(AppError::Unauthorised)
            },
        }
    }
}
