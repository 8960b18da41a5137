// ===================================
// tests/integration/registration_tests.rs
// ===================================
//! Account uniqueness, renaming, short ids, pictures and deletion end to end
use crate::test_utils::{error_code, register_and_login, send, test_app, test_settings};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use linkhub_backend_lib::{routes, AppState};
use serde_json::json;
use tempfile::TempDir;
use tower::ServiceExt;

async fn register(app: &axum::Router, email: &str, username: &str, password: &str) -> (StatusCode, serde_json::Value) {
    send(
        app,
        Method::POST,
        "/users",
        None,
        Some(json!({ "email": email, "username": username, "password": password })),
    )
    .await
}

#[tokio::test]
async fn test_register_exactly_once() {
    let (app, _state, _temp_dir) = test_app();

    let (status, body) = register(&app, "a@x.com", "alice", "secret1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["short_id"].as_str().unwrap().chars().count(), 6);

    let (status, body) = register(&app, "a@x.com", "someone", "secret1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "ACC_001");

    let (status, body) = register(&app, "A@X.COM", "someone", "secret1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "ACC_001");

    let (status, body) = register(&app, "b@x.com", "alice", "secret1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "ACC_002");
}

#[tokio::test]
async fn test_register_validation() {
    let (app, _state, _temp_dir) = test_app();

    for (email, username, password) in [
        ("not-an-email", "alice", "secret1"),
        ("a@x.com", "   ", "secret1"),
        ("a@x.com", "alice", "12345"),
    ] {
        let (status, body) = register(&app, email, username, password).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{email} {username} {password}");
        assert_eq!(error_code(&body), "VAL_001");
    }

    // Nothing was created along the way
    let (status, _) = register(&app, "a@x.com", "alice", "secret1").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_concurrent_registrations_commit_once() {
    let (app, _state, _temp_dir) = test_app();

    let attempts = (0..8).map(|i| {
        let app = app.clone();
        async move { register(&app, "race@x.com", &format!("racer{i}"), "secret1").await.0 }
    });
    let statuses = join_spawned(attempts).await;

    let created = statuses.iter().filter(|s| **s == StatusCode::CREATED).count();
    assert_eq!(created, 1, "{statuses:?}");
    assert!(statuses
        .iter()
        .all(|s| *s == StatusCode::CREATED || *s == StatusCode::BAD_REQUEST));
}

async fn join_spawned<F>(futures: impl Iterator<Item = F>) -> Vec<StatusCode>
where
    F: std::future::Future<Output = StatusCode> + Send + 'static,
{
    let handles: Vec<_> = futures.map(tokio::spawn).collect();
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    results
}

#[tokio::test]
async fn test_rename_rules() {
    let (app, _state, _temp_dir) = test_app();
    let (alice_id, _, alice_token) = register_and_login(&app, "a@x.com", "alice", "secret1").await;
    register_and_login(&app, "b@x.com", "bob", "secret2").await;

    let uri = format!("/users/{alice_id}/username");

    let (status, body) = send(&app, Method::PATCH, &uri, Some(&alice_token), Some(json!({ "username": "bob" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "ACC_002");

    let (status, body) = send(&app, Method::PATCH, &uri, Some(&alice_token), Some(json!({ "username": "alice" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "alice");

    let (status, body) = send(&app, Method::PATCH, &uri, Some(&alice_token), Some(json!({ "username": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VAL_001");
}

#[tokio::test]
async fn test_regenerate_short_id() {
    let (app, _state, _temp_dir) = test_app();
    let (id, old_short_id, token) = register_and_login(&app, "a@x.com", "alice", "secret1").await;

    let (status, body) = send(&app, Method::POST, &format!("/users/{id}/short-id"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let new_short_id = body["short_id"].as_str().unwrap().to_string();
    assert_eq!(new_short_id.chars().count(), 6);
    assert_ne!(new_short_id, old_short_id);

    let (status, body) = send(&app, Method::GET, &format!("/profiles/{new_short_id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.as_str());
    assert!(body.get("email").is_none());

    let (status, _) = send(&app, Method::GET, &format!("/profiles/{old_short_id}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ill_formed_profile_ids_are_not_found() {
    let (app, _state, _temp_dir) = test_app();
    register_and_login(&app, "a@x.com", "alice", "secret1").await;

    for short_id in ["abc12", "abc1234", "abc12O", "a%20b%20c", "alice0"] {
        let (status, body) = send(&app, Method::GET, &format!("/profiles/{short_id}"), None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{short_id}");
        assert_eq!(error_code(&body), "NF_001");
    }
}

async fn put_picture(app: &axum::Router, id: &str, token: &str, content_type: &str, bytes: &'static [u8]) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(format!("/users/{id}/picture"))
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(bytes))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_profile_picture_lifecycle() {
    let (app, _state, temp_dir) = test_app();
    let (id, _, token) = register_and_login(&app, "a@x.com", "alice", "secret1").await;
    let assets = temp_dir.path().join("assets");

    let (status, body) = put_picture(&app, &id, &token, "image/png", b"first").await;
    assert_eq!(status, StatusCode::OK);
    let first = body["profile_picture"].as_str().unwrap().to_string();
    assert!(assets.join(&first).exists());

    let (status, body) = put_picture(&app, &id, &token, "image/jpeg", b"second").await;
    assert_eq!(status, StatusCode::OK);
    let second = body["profile_picture"].as_str().unwrap().to_string();
    assert!(second.ends_with(".jpg"));
    assert!(!assets.join(&first).exists());
    assert!(assets.join(&second).exists());

    let (status, body) = put_picture(&app, &id, &token, "text/html", b"<html>").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "VAL_001");

    let (status, _) = send(&app, Method::DELETE, &format!("/users/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!assets.join(&second).exists());
}

#[tokio::test]
async fn test_accounts_survive_restart() {
    let temp_dir = TempDir::new().unwrap();

    let state = AppState::flat_file(test_settings(&temp_dir)).unwrap();
    let app = routes::create_router(state);
    let (id, short_id, token) = register_and_login(&app, "a@x.com", "alice", "secret1").await;
    drop(app);

    let state = AppState::flat_file(test_settings(&temp_dir)).unwrap();
    let app = routes::create_router(state);

    // Same secret, so the old token still works
    let (status, body) = send(&app, Method::GET, "/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["short_id"], short_id.as_str());

    let (status, body) = register(&app, "a@x.com", "other", "secret1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "ACC_001");

    let (status, _) = send(&app, Method::GET, &format!("/users/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
}
