//! HTTP handlers.

pub mod users;

/// Liveness check
pub async fn health() -> &'static str {
    "OK"
}
