// ============================
// crates/backend-lib/src/routes.rs
// ============================
//! HTTP router.
use crate::handlers::{self, users};
use crate::middleware::require_auth;
use crate::AppState;
use axum::{
    body::Body,
    http::Request,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(handlers::health))
        .route("/users", post(users::register))
        .route("/users/login", post(users::login))
        .route("/users/{id}", get(users::get_user))
        .route("/profiles/{short_id}", get(users::get_profile));

    let owned = Router::new()
        .route("/me", get(users::me))
        .route("/users/{id}", delete(users::delete_user))
        .route("/users/{id}/username", patch(users::rename))
        .route("/users/{id}/short-id", post(users::regenerate_short_id))
        .route("/users/{id}/picture", put(users::set_picture))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            account_id = tracing::field::Empty,
        )
    });

    public
        .merge(owned)
        .layer(trace)
        .layer(cors)
        .with_state(state)
}
