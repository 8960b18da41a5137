// ==============================
// tests/unit/middleware_tests.rs
// ==============================
//! Unit tests for the bearer-token guard on a minimal router
use linkhub_backend_lib::access::Identity;
use linkhub_backend_lib::middleware::require_auth;
use linkhub_backend_lib::AppState;

use crate::test_utils::setup_test_env;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware::from_fn_with_state,
    routing::get,
    Router,
};
use tower::ServiceExt;
use zeroize::Zeroizing;

async fn owner_email(identity: Identity) -> String {
    identity.account.email
}

fn guarded(state: AppState) -> Router {
    Router::new()
        .route("/private", get(owner_email))
        .route_layer(from_fn_with_state(state.clone(), require_auth))
        .route("/public", get(|| async { "open" }))
        .with_state(state)
}

async fn status_of(app: &Router, uri: &str, authorization: Option<String>) -> StatusCode {
    let mut builder = Request::builder().uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn test_guard_only_applies_to_layered_routes() {
    let (state, _temp_dir) = setup_test_env();
    let app = guarded(state);

    assert_eq!(status_of(&app, "/public", None).await, StatusCode::OK);
    assert_eq!(status_of(&app, "/private", None).await, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_guard_accepts_issued_token() {
    let (state, _temp_dir) = setup_test_env();
    state
        .auth
        .register("a@x.com", "alice", Zeroizing::new("secret1".to_string()))
        .await
        .unwrap();
    let token = state
        .auth
        .login("a@x.com", Zeroizing::new("secret1".to_string()))
        .await
        .unwrap();
    let app = guarded(state);

    let authorization = Some(format!("Bearer {}", token.token));
    assert_eq!(status_of(&app, "/private", authorization).await, StatusCode::OK);

    let wrong_scheme = Some(format!("Token {}", token.token));
    assert_eq!(status_of(&app, "/private", wrong_scheme).await, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_guard_rejects_token_from_other_secret() {
    let (state, _temp_dir) = setup_test_env();
    let account = state
        .auth
        .register("a@x.com", "alice", Zeroizing::new("secret1".to_string()))
        .await
        .unwrap();

    let foreign = linkhub_backend_lib::auth::TokenService::new(b"another-secret", state.settings.token_ttl())
        .unwrap()
        .issue(account.id)
        .unwrap();
    let app = guarded(state);

    let authorization = Some(format!("Bearer {}", foreign.token));
    assert_eq!(status_of(&app, "/private", authorization).await, StatusCode::FORBIDDEN);
}
