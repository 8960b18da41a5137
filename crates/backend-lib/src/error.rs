// crates/backend-lib/src/error.rs

//! Central error type + Axum integration.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::storage::StoreError;
use crate::validation::ValidationError;

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Email is taken")]
    DuplicateEmail,

    #[error("Username is taken")]
    DuplicateUsername,

    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing, invalid or expired token, or identity mismatch. The cause is
    /// deliberately not carried.
    #[error("Unauthorised")]
    Unauthorised,

    #[error("Invalid credentials")]
    InvalidCredential,

    #[error("Short id collided at commit")]
    ShortIdCollision,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::DuplicateEmail | AppError::DuplicateUsername => {
                StatusCode::BAD_REQUEST
            },
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorised => StatusCode::FORBIDDEN,
            AppError::InvalidCredential => StatusCode::UNAUTHORIZED,
            AppError::ShortIdCollision | AppError::Store(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VAL_001",
            AppError::DuplicateEmail => "ACC_001",
            AppError::DuplicateUsername => "ACC_002",
            AppError::ShortIdCollision => "ACC_003",
            AppError::NotFound(_) => "NF_001",
            AppError::Unauthorised => "AUTH_001",
            AppError::InvalidCredential => "AUTH_002",
            AppError::Store(_) => "STORE_001",
            AppError::Internal(_) => "INT_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::Validation(e) => e.to_string(),
            AppError::DuplicateEmail => "Email is taken".to_string(),
            AppError::DuplicateUsername => "Username is taken".to_string(),
            AppError::NotFound(_) => "Resource not found".to_string(),
            AppError::Unauthorised => "Unauthorised".to_string(),
            AppError::InvalidCredential => "Invalid credentials".to_string(),
            AppError::ShortIdCollision | AppError::Store(_) | AppError::Internal(_) => {
                "An internal server error occurred".to_string()
            },
        }
    }

    /// Whether the failure is on our side rather than the caller's
    pub fn is_internal(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        if self.is_internal() {
            tracing::error!(code = error_code, error = %self, "request failed");
        }

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = serde_json::json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("background task failed: {err}"))
    }
}
