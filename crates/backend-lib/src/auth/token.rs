// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Signed bearer tokens.
//!
//! Tokens are HS256 JWTs carrying the account id as `sub`. They are not stored
//! anywhere and cannot be revoked: a token stays valid until `exp` even if the
//! account changes its password, its username or is deleted.
use crate::accounts::AccountId;
use crate::error::AppError;
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Token validity window (30 days)
pub const TOKEN_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 30);

/// Size of a generated signing secret in bytes (256 bits)
const SECRET_BYTES: usize = 32;

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: account id. Optional here so a token without it is reported as
    /// missing a subject rather than as undecodable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Issued at (unix timestamp)
    pub iat: i64,
    /// Expiration (unix timestamp)
    pub exp: i64,
}

/// A freshly issued bearer credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    /// Encoded token, signature included
    pub token: String,
    pub subject: AccountId,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Why a token was refused. Only ever logged, never sent to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    Malformed,
    BadSignature,
    Expired,
    MissingSubject,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            InvalidReason::Malformed => "malformed",
            InvalidReason::BadSignature => "bad signature",
            InvalidReason::Expired => "expired",
            InvalidReason::MissingSubject => "missing subject",
        };
        f.write_str(reason)
    }
}

/// Token verification failure
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token: {0}")]
    Invalid(InvalidReason),
}

impl TokenError {
    pub fn reason(&self) -> InvalidReason {
        match self {
            TokenError::Invalid(reason) => *reason,
        }
    }
}

impl From<TokenError> for AppError {
    fn from(_: TokenError) -> Self {
        AppError::Unauthorised
    }
}

/// Issues and verifies bearer tokens with a process-wide secret.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
}

impl TokenService {
    /// Create a token service with an HMAC secret and validity window
    pub fn new(secret: &[u8], ttl: Duration) -> anyhow::Result<Self> {
        if secret.is_empty() {
            anyhow::bail!("token signing secret must not be empty");
        }
        let ttl = chrono::Duration::from_std(ttl)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
        })
    }

    /// Issue a token for `subject`, valid from now
    pub fn issue(&self, subject: AccountId) -> Result<AuthToken, AppError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token as if it had been minted at `issued_at`
    pub fn issue_at(&self, subject: AccountId, issued_at: DateTime<Utc>) -> Result<AuthToken, AppError> {
        let issued_at = truncate_to_seconds(issued_at);
        let expires_at = issued_at + self.ttl;
        let claims = Claims {
            sub: Some(subject.to_string()),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))?;

        Ok(AuthToken {
            token,
            subject,
            issued_at,
            expires_at,
        })
    }

    /// Verify signature and expiry and return the subject
    pub fn verify(&self, token: &str) -> Result<AccountId, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| TokenError::Invalid(classify(e.kind())))?;

        let subject = data.claims.sub.as_deref().map(str::trim).unwrap_or_default();
        if subject.is_empty() {
            return Err(TokenError::Invalid(InvalidReason::MissingSubject));
        }
        subject
            .parse()
            .map_err(|_| TokenError::Invalid(InvalidReason::Malformed))
    }
}

fn classify(kind: &ErrorKind) -> InvalidReason {
    match kind {
        ErrorKind::InvalidSignature => InvalidReason::BadSignature,
        ErrorKind::ExpiredSignature => InvalidReason::Expired,
        _ => InvalidReason::Malformed,
    }
}

fn truncate_to_seconds(at: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_opt(at.timestamp(), 0).single().unwrap_or(at)
}

/// Generate a random signing secret from the thread-local CSPRNG
pub fn generate_secret() -> Vec<u8> {
    let mut buffer = vec![0u8; SECRET_BYTES];
    rand::rng().fill(buffer.as_mut_slice());
    buffer
}
