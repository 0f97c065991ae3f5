use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::instrument;

use crate::auth::dto::{AuthResponse, LoginRequest, SignupRequest};
use crate::auth::jwt::JwtKeys;
use crate::auth::service;
use crate::error::ApiError;
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
}

#[instrument(skip(state, payload))]
async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let (user, token) = service::signup(
        state.store.as_ref(),
        &keys,
        &payload.username,
        &payload.email,
        &payload.password,
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            user: user.into(),
            token,
        }),
    ))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let (user, token) = service::login(
        state.store.as_ref(),
        &keys,
        &payload.username_or_email,
        &payload.password,
    )
    .await?;
    Ok(Json(AuthResponse {
        success: true,
        user: user.into(),
        token,
    }))
}
