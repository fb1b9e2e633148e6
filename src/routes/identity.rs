// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity routes: registration, login, token refresh and profile lookup.

use crate::error::{AppError, Result};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::models::{NewUser, UserProfile};
use crate::services::passwords::{hash_password_blocking, verify_password_blocking};
use crate::services::TokenPair;
use crate::IdentityState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Routes that do not need a token.
pub fn public_routes() -> Router<Arc<IdentityState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/token/refresh", post(refresh))
}

/// Routes that need an access token; the auth middleware is applied in
/// routes/mod.rs.
pub fn protected_routes() -> Router<Arc<IdentityState>> {
    Router::new().route("/api/auth/me", get(me))
}

// ─── Registration ────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RegisterResponse {
    pub user: UserProfile,
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub message: String,
}

/// Create a user and log them straight in.
async fn register(
    State(state): State<Arc<IdentityState>>,
    ValidJson(new_user): ValidJson<NewUser>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    new_user.check_consistency().map_err(AppError::Validation)?;

    // Fail fast before paying for a hash; insert_user re-checks atomically.
    if state.users.find_by_username(&new_user.username)?.is_some() {
        return Err(AppError::Conflict(
            "A user with that username already exists".to_string(),
        ));
    }

    let NewUser {
        username,
        password,
        email,
        ..
    } = new_user;

    let password_hash = hash_password_blocking(password).await?;
    let now = chrono::Utc::now();
    let user = state
        .users
        .insert_user(&username, email, password_hash, now)?;

    let tokens = state.tokens.issue_pair(user.id, now.timestamp())?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: UserProfile::from(&user),
            tokens,
            message: "Registration complete".to_string(),
        }),
    ))
}

// ─── Login ───────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
struct LoginRequest {
    #[validate(length(min = 1, message = "Username cannot be empty"))]
    username: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    password: String,
}

/// Exchange credentials for an access + refresh token pair.
async fn login(
    State(state): State<Arc<IdentityState>>,
    ValidJson(credentials): ValidJson<LoginRequest>,
) -> Result<Json<TokenPair>> {
    let Some(user) = state.users.find_by_username(&credentials.username)? else {
        tracing::warn!(username = %credentials.username, "Login failed: unknown user");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password_blocking(credentials.password, user.password_hash.clone()).await? {
        tracing::warn!(user_id = user.id, "Login failed: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    tracing::info!(user_id = user.id, "User logged in");

    let tokens = state
        .tokens
        .issue_pair(user.id, chrono::Utc::now().timestamp())?;
    Ok(Json(tokens))
}

// ─── Token Refresh ───────────────────────────────────────────

#[derive(Deserialize, Validate)]
struct RefreshRequest {
    #[validate(length(min = 1, message = "Refresh token cannot be empty"))]
    refresh: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RefreshResponse {
    pub access: String,
}

/// Mint a new access token from a refresh token.
async fn refresh(
    State(state): State<Arc<IdentityState>>,
    ValidJson(request): ValidJson<RefreshRequest>,
) -> Result<Json<RefreshResponse>> {
    let access = state
        .tokens
        .refresh_access(&request.refresh, chrono::Utc::now().timestamp())?;

    Ok(Json(RefreshResponse { access }))
}

// ─── Current User ────────────────────────────────────────────

/// Get the profile of the token's user.
async fn me(
    State(state): State<Arc<IdentityState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserProfile>> {
    let profile = state.users.get_user(user.user_id)?.ok_or_else(|| {
        // Token is well-signed but its user no longer exists.
        tracing::warn!(user_id = user.user_id, "Token for unknown user");
        AppError::InvalidToken
    })?;

    Ok(Json(UserProfile::from(&profile)))
}
