// ================
// common/src/lib.rs
// ================
//! Wire types shared between the `LinkHub` backend and its clients.
//! This module defines the JSON request and response bodies of the account API.

use serde::{Deserialize, Serialize};

/// Body of `POST /users`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterRequest {
    /// Email address, unique across accounts
    pub email: String,
    /// Display handle, unique across accounts
    pub username: String,
    /// Plaintext password (min 6 chars)
    pub password: String,
}

/// Response to a successful registration
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RegisterResponse {
    pub message: String,
    /// Immutable account id
    pub id: String,
    /// Public short identifier of the new profile
    pub short_id: String,
}

/// Body of `POST /users/login`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Bearer token handed out at login
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TokenResponse {
    /// Value to send back as `Authorization: Bearer <token>`
    pub token: String,
    /// Expiry as a unix timestamp (seconds)
    pub expires_at: i64,
}

/// Body of `PATCH /users/{id}/username`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RenameRequest {
    pub username: String,
}

/// Response to a short id regeneration
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ShortIdResponse {
    pub short_id: String,
}

/// Outward view of an account. Never carries credential material.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AccountView {
    pub id: String,
    pub username: String,
    pub short_id: String,
    /// Only present when the caller is the account owner
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// Plain acknowledgement body
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
