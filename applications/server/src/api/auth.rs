/// Registration and login routes
use crate::{
    api::extract::ApiJson,
    error::Result,
    services::auth::TOKEN_TYPE,
    state::AppState,
};
use axum::{extract::State, Json};
use gatehouse_core::{Role, User};
use serde::{Deserialize, Serialize};

// No `Debug`: these carry plaintext passwords.
#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /register
pub async fn register(
    State(app_state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<Json<User>> {
    tracing::info!(username = %req.username, role = %req.role, "registration attempt");

    let user = app_state
        .accounts
        .register(&req.username, &req.password, req.role)
        .await
        .inspect_err(|e| tracing::warn!(username = %req.username, "registration failed: {}", e))?;

    Ok(Json(user))
}

/// POST /login
pub async fn login(
    State(app_state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    tracing::info!(username = %req.username, "login attempt");

    let user = app_state
        .accounts
        .authenticate(&req.username, &req.password)
        .await
        .inspect_err(|_| tracing::warn!(username = %req.username, "login failed"))?;

    let access_token = app_state.tokens.issue(&user.username, user.role)?;

    tracing::info!(username = %user.username, role = %user.role, "login successful");

    Ok(Json(LoginResponse {
        access_token,
        token_type: TOKEN_TYPE.to_string(),
    }))
}
