// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication: credential hashing, bearer tokens and the register/login flows.

pub mod password;
pub mod token;
mod service;
mod service_impl;

pub use password::{PasswordRequirements, PasswordVault, MIN_PASSWORD_LENGTH};
pub use service::AuthService;
pub use service_impl::DefaultAuth;
pub use token::{generate_secret, AuthToken, InvalidReason, TokenError, TokenService, TOKEN_TTL};
