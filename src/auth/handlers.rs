use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{AuthResponse, Credentials, RefreshRequest},
        jwt::AuthUser,
        repo_types::Identity,
        services::AuthService,
    },
    error::AppError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

#[instrument(skip(auth, payload))]
pub async fn register(
    State(auth): State<AuthService>,
    Json(payload): Json<Credentials>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let signed = auth.sign_up(&payload.email, &payload.password).await?;
    Ok((StatusCode::CREATED, Json(signed.into())))
}

#[instrument(skip(auth, payload))]
pub async fn login(
    State(auth): State<AuthService>,
    Json(payload): Json<Credentials>,
) -> Result<Json<AuthResponse>, AppError> {
    let signed = auth.sign_in(&payload.email, &payload.password).await?;
    Ok(Json(signed.into()))
}

#[instrument(skip(auth, payload))]
pub async fn refresh(
    State(auth): State<AuthService>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let signed = auth.refresh(&payload.refresh_token).await?;
    Ok(Json(signed.into()))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Identity>, AppError> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
    Ok(Json(user.into()))
}
