// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
//!
//! Layers, lowest first: built-in defaults, a TOML file, then `LINKHUB_*`
//! environment variables with nested keys split by `__`
//! (`LINKHUB_SERVER__PORT=8080`).
use crate::auth::{generate_secret, PasswordRequirements, PasswordVault, MIN_PASSWORD_LENGTH, TOKEN_TTL};
use anyhow::{bail, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
pub const ENV_PREFIX: &str = "LINKHUB_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const MAX_SCRYPT_LOG_N: u8 = 20;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub auth: AuthSettings,
    pub password: PasswordRequirements,
    /// Default filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageSettings {
    /// Root of the flat-file account store and asset directory
    pub path: PathBuf,
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AuthSettings {
    /// HMAC secret for bearer tokens. Unset means a random per-process secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwt_secret: Option<String>,
    pub token_ttl_secs: u64,
    /// scrypt cost as log2(N)
    pub scrypt_log_n: u8,
}

impl fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("scrypt_log_n", &self.scrypt_log_n)
            .finish()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            storage: StorageSettings::default(),
            auth: AuthSettings::default(),
            password: PasswordRequirements::default(),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data"),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_secs: TOKEN_TTL.as_secs(),
            scrypt_log_n: crate::auth::password::DEFAULT_SCRYPT_LOG_N,
        }
    }
}

impl Settings {
    /// Load from `config.toml` (if present) and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from the given TOML file (if present) and the environment
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::extract(Self::figment(path.as_ref(), ENV_PREFIX))
    }

    /// The layered provider chain, without extracting
    pub fn figment(path: &Path, env_prefix: &str) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(env_prefix).split("__"))
    }

    fn extract(figment: Figment) -> Result<Self> {
        let settings: Settings = figment.extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("server.port must be non-zero");
        }
        if self.server.host.trim().is_empty() {
            bail!("server.host must not be empty");
        }
        if self.auth.token_ttl_secs == 0 {
            bail!("auth.token_ttl_secs must be positive");
        }
        if self.auth.jwt_secret.as_deref().is_some_and(str::is_empty) {
            bail!("auth.jwt_secret must not be empty when set");
        }
        if self.auth.scrypt_log_n == 0 || self.auth.scrypt_log_n > MAX_SCRYPT_LOG_N {
            bail!("auth.scrypt_log_n must be between 1 and {MAX_SCRYPT_LOG_N}");
        }
        PasswordVault::with_cost(self.auth.scrypt_log_n)?;
        if self.password.min_length < MIN_PASSWORD_LENGTH {
            bail!("password.min_length must be at least {MIN_PASSWORD_LENGTH}");
        }
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            bail!("log_level must be one of {}", LOG_LEVELS.join(", "));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.auth.token_ttl_secs)
    }

    /// Configured token secret, or a fresh random one
    pub fn signing_secret(&self) -> Vec<u8> {
        match &self.auth.jwt_secret {
            Some(secret) => secret.as_bytes().to_vec(),
            None => {
                tracing::warn!("auth.jwt_secret not set, using a random secret; tokens will not survive a restart");
                generate_secret()
            },
        }
    }

    pub fn password_vault(&self) -> Result<PasswordVault> {
        PasswordVault::with_cost(self.auth.scrypt_log_n)
    }
}
