// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use rand::Rng;
use scrypt::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Params, Scrypt,
};
use serde::Deserialize;
use zeroize::Zeroizing;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Cost used for new hashes unless configured otherwise
pub const DEFAULT_SCRYPT_LOG_N: u8 = 15;

const SALT_BYTES: usize = 16;

/// Password complexity requirements
#[derive(Debug, Clone, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct PasswordRequirements {
    pub min_length: usize,
    pub require_uppercase: bool,
    pub require_lowercase: bool,
    pub require_digit: bool,
    pub require_special: bool,
}

impl Default for PasswordRequirements {
    fn default() -> Self {
        Self {
            min_length: MIN_PASSWORD_LENGTH,
            require_uppercase: false,
            require_lowercase: false,
            require_digit: false,
            require_special: false,
        }
    }
}

/// One-way credential hashing with scrypt.
///
/// Hashes are PHC strings, so the salt and cost travel with the hash and
/// [`PasswordVault::verify`] works for hashes made under any earlier cost.
#[derive(Debug, Clone, Copy)]
pub struct PasswordVault {
    params: Params,
}

impl Default for PasswordVault {
    fn default() -> Self {
        Self {
            params: Params::recommended(),
        }
    }
}

impl PasswordVault {
    /// Vault hashing with `2^log_n` iterations (r = 8, p = 1).
    pub fn with_cost(log_n: u8) -> anyhow::Result<Self> {
        let params = Params::new(log_n, Params::RECOMMENDED_R, Params::RECOMMENDED_P, Params::RECOMMENDED_LEN)
            .map_err(|e| anyhow::anyhow!("invalid scrypt cost {log_n}: {e}"))?;
        Ok(Self { params })
    }

    /// Hash a password using scrypt and a fresh random salt
    pub fn hash(&self, plain: &str) -> anyhow::Result<String> {
        let mut salt_bytes = [0u8; SALT_BYTES];
        rand::rng().fill(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| anyhow::anyhow!("salt encoding failed: {e}"))?;

        let hash = Scrypt
            .hash_password_customized(plain.as_bytes(), None, None, self.params, &salt)
            .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?
            .to_string();
        Ok(hash)
    }

    /// Verify a password against a hash. Mismatches and unparseable hashes are `false`.
    pub fn verify(&self, plain: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };
        Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
    }

    /// Hash a password and wipe the plaintext buffer afterwards
    pub fn hash_secure(&self, plain: Zeroizing<String>) -> anyhow::Result<String> {
        self.hash(plain.as_str())
    }
}
