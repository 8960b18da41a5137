//! Bearer-token guard for owned routes.
use crate::error::AppError;
use crate::AppState;
use axum::{extract::State, http::Request, middleware::Next, response::Response};

/// Resolve the bearer token to an [`Identity`](crate::access::Identity) and
/// attach it to the request.
///
/// Missing, malformed or expired tokens, and tokens for accounts that no longer
/// exist, stop the request with `403 Unauthorised` before the handler runs.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let identity = state.auth.authenticate(request.headers()).await?;

    tracing::Span::current().record("account_id", tracing::field::display(identity.account_id()));
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
