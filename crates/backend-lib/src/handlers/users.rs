// ============================
// crates/backend-lib/src/handlers/users.rs
// ============================
//! Account endpoints.
//!
//! Owned routes compare the path id with the caller's identity before any
//! lookup, so another account's id gets `403` whether or not it exists.
use crate::access::{ensure_owner, Identity};
use crate::accounts::{short_id::is_well_formed, AccountId};
use crate::error::AppError;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    Json,
};
use linkhub_common::{
    AccountView, LoginRequest, MessageResponse, RegisterRequest, RegisterResponse, RenameRequest,
    ShortIdResponse, TokenResponse,
};
use zeroize::Zeroizing;

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let RegisterRequest { email, username, password } = request;
    let account = state
        .auth
        .register(&email, &username, Zeroizing::new(password))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created".to_string(),
            id: account.id.to_string(),
            short_id: account.short_id.to_string(),
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let LoginRequest { email, password } = request;
    let token = state.auth.login(&email, Zeroizing::new(password)).await?;

    Ok(Json(TokenResponse {
        token: token.token,
        expires_at: token.expires_at.timestamp(),
    }))
}

/// Public profile by account id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AccountView>, AppError> {
    let not_found = || AppError::NotFound("User not found".to_string());
    let id: AccountId = id.parse().map_err(|_| not_found())?;
    let account = state.registry.find_by_id(id).await?.ok_or_else(not_found)?;
    Ok(Json(account.public_view()))
}

/// Public profile by short id
pub async fn get_profile(
    State(state): State<AppState>,
    Path(short_id): Path<String>,
) -> Result<Json<AccountView>, AppError> {
    if !is_well_formed(&short_id) {
        return Err(AppError::NotFound("Profile not found".to_string()));
    }
    let account = state
        .registry
        .find_by_short_id(&short_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    Ok(Json(account.public_view()))
}

/// The caller's own account, email included
pub async fn me(identity: Identity) -> Json<AccountView> {
    Json(identity.account.owner_view())
}

pub async fn rename(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    Json(request): Json<RenameRequest>,
) -> Result<Json<AccountView>, AppError> {
    let id = owned_target(&identity, &id)?;
    let account = state.registry.rename(id, &request.username).await?;
    Ok(Json(account.snapshot().owner_view()))
}

pub async fn regenerate_short_id(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<ShortIdResponse>, AppError> {
    let id = owned_target(&identity, &id)?;
    let short_id = state.registry.regenerate_short_id(id).await?;
    Ok(Json(ShortIdResponse {
        short_id: short_id.to_string(),
    }))
}

/// Replace the profile picture with the raw request body
pub async fn set_picture(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<AccountView>, AppError> {
    let id = owned_target(&identity, &id)?;
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let account = state
        .registry
        .set_profile_picture(id, &body, content_type)
        .await?;
    Ok(Json(account.snapshot().owner_view()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = owned_target(&identity, &id)?;
    state.registry.delete(id).await?;
    Ok(Json(MessageResponse::new("User deleted")))
}

/// Parse a path id and require it to be the caller's own.
/// An unparseable id can never match, so it is refused the same way.
fn owned_target(identity: &Identity, raw: &str) -> Result<AccountId, AppError> {
    let id: AccountId = raw.parse().map_err(|_| AppError::Unauthorised)?;
    ensure_owner(identity, &id)?;
    Ok(id)
}
