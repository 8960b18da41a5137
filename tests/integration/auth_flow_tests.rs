// ===============================
// tests/integration/auth_flow_tests.rs
// ===============================
//! Register, log in and act on owned resources through the router
use crate::test_utils::{error_code, register_and_login, send, test_app};
use axum::http::{Method, StatusCode};
use linkhub_common::TokenResponse;
use serde_json::json;

#[tokio::test]
async fn test_register_login_and_foreign_rename() {
    let (app, _state, _temp_dir) = test_app();

    let (alice_id, _, alice_token) = register_and_login(&app, "a@x.com", "alice", "secret1").await;
    let (bob_id, _, _) = register_and_login(&app, "b@x.com", "bob", "secret2").await;

    // Alice may not rename Bob
    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/users/{bob_id}/username"),
        Some(&alice_token),
        Some(json!({ "username": "mallory" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_code(&body), "AUTH_001");

    let (status, body) = send(&app, Method::GET, &format!("/users/{bob_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "bob");

    // She may rename herself
    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/users/{alice_id}/username"),
        Some(&alice_token),
        Some(json!({ "username": "alice2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice2");
    assert_eq!(body["email"], "a@x.com");
}

#[tokio::test]
async fn test_foreign_target_is_forbidden_even_if_missing() {
    let (app, _state, _temp_dir) = test_app();
    let (_, _, token) = register_and_login(&app, "a@x.com", "alice", "secret1").await;

    let missing = "00000000-0000-4000-8000-000000000000";
    for (method, uri) in [
        (Method::DELETE, format!("/users/{missing}")),
        (Method::POST, format!("/users/{missing}/short-id")),
        (Method::DELETE, "/users/not-a-uuid".to_string()),
    ] {
        let (status, _) = send(&app, method, &uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{uri}");
    }
}

#[tokio::test]
async fn test_login_failures() {
    let (app, _state, _temp_dir) = test_app();
    register_and_login(&app, "a@x.com", "alice", "secret1").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/users/login",
        None,
        Some(json!({ "email": "a@x.com", "password": "wrong-one" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(&body), "AUTH_002");

    let (status, body) = send(
        &app,
        Method::POST,
        "/users/login",
        None,
        Some(json!({ "email": "nobody@x.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "NF_001");
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let (app, _state, _temp_dir) = test_app();
    register_and_login(&app, "Alice@Example.com", "alice", "secret1").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/users/login",
        None,
        Some(json!({ "email": "alice@example.COM", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token: TokenResponse = serde_json::from_value(body).unwrap();
    assert!(!token.token.is_empty());
    assert!(token.expires_at > chrono::Utc::now().timestamp());
}

#[tokio::test]
async fn test_guarded_routes_require_token() {
    let (app, _state, _temp_dir) = test_app();
    let (id, _, token) = register_and_login(&app, "a@x.com", "alice", "secret1").await;

    let (status, body) = send(&app, Method::GET, "/me", None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["message"], "Unauthorised");

    let (status, _) = send(&app, Method::GET, "/me", Some("not-a-token"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, Method::GET, "/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["email"], "a@x.com");
}

#[tokio::test]
async fn test_token_of_deleted_account_is_rejected() {
    let (app, _state, _temp_dir) = test_app();
    let (id, _, token) = register_and_login(&app, "a@x.com", "alice", "secret1").await;

    let (status, _) = send(&app, Method::DELETE, &format!("/users/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, "/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::GET, &format!("/users/{id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let (app, state, _temp_dir) = test_app();
    let (id, _, _) = register_and_login(&app, "a@x.com", "alice", "secret1").await;

    let tokens = linkhub_backend_lib::auth::TokenService::new(
        state.settings.auth.jwt_secret.as_deref().unwrap().as_bytes(),
        state.settings.token_ttl(),
    )
    .unwrap();
    let stale = tokens
        .issue_at(id.parse().unwrap(), chrono::Utc::now() - chrono::Duration::days(31))
        .unwrap();

    let (status, _) = send(&app, Method::GET, "/me", Some(&stale.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
