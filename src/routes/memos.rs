// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Memo CRUD routes.
//!
//! Every handler receives the verified [`AuthUser`] from the auth middleware
//! and passes its ID to the store; a memo that is missing and a memo that
//! belongs to another user produce the same 404.

use crate::error::{AppError, Result};
use crate::extract::{ApiPath, ApiQuery, ValidJson};
use crate::middleware::auth::AuthUser;
use crate::models::{Memo, MemoPatch, NewMemo};
use crate::MemoState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Memo routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<MemoState>> {
    Router::new()
        .route("/api/memos", get(list_memos).post(create_memo))
        .route(
            "/api/memos/{id}",
            get(get_memo).put(update_memo).delete(delete_memo),
        )
}

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 100;

#[derive(Deserialize)]
struct ListQuery {
    /// Number of memos to skip
    #[serde(default)]
    skip: usize,
    /// Page size, capped at `MAX_LIMIT`
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn not_found(memo_id: i64) -> AppError {
    AppError::NotFound(format!("Memo {} not found", memo_id))
}

/// Create a memo owned by the caller.
async fn create_memo(
    State(state): State<Arc<MemoState>>,
    Extension(user): Extension<AuthUser>,
    ValidJson(new_memo): ValidJson<NewMemo>,
) -> Result<(StatusCode, Json<Memo>)> {
    let memo = state
        .db
        .create_memo(user.user_id, new_memo, chrono::Utc::now())?;

    tracing::info!(user_id = user.user_id, memo_id = memo.id, "Memo created");

    Ok((StatusCode::CREATED, Json(memo)))
}

/// List the caller's memos.
async fn list_memos(
    State(state): State<Arc<MemoState>>,
    Extension(user): Extension<AuthUser>,
    ApiQuery(params): ApiQuery<ListQuery>,
) -> Result<Json<Vec<Memo>>> {
    let limit = params.limit.min(MAX_LIMIT);

    tracing::debug!(
        user_id = user.user_id,
        skip = params.skip,
        limit,
        "Listing memos"
    );

    let memos = state.db.list_memos(user.user_id, params.skip, limit)?;
    Ok(Json(memos))
}

/// Get one of the caller's memos.
async fn get_memo(
    State(state): State<Arc<MemoState>>,
    Extension(user): Extension<AuthUser>,
    ApiPath(memo_id): ApiPath<i64>,
) -> Result<Json<Memo>> {
    state
        .db
        .get_memo(user.user_id, memo_id)?
        .map(Json)
        .ok_or_else(|| not_found(memo_id))
}

/// Partially update one of the caller's memos.
async fn update_memo(
    State(state): State<Arc<MemoState>>,
    Extension(user): Extension<AuthUser>,
    ApiPath(memo_id): ApiPath<i64>,
    ValidJson(patch): ValidJson<MemoPatch>,
) -> Result<Json<Memo>> {
    let memo = state
        .db
        .update_memo(user.user_id, memo_id, patch, chrono::Utc::now())?
        .ok_or_else(|| not_found(memo_id))?;

    tracing::info!(user_id = user.user_id, memo_id, "Memo updated");

    Ok(Json(memo))
}

/// Delete one of the caller's memos.
async fn delete_memo(
    State(state): State<Arc<MemoState>>,
    Extension(user): Extension<AuthUser>,
    ApiPath(memo_id): ApiPath<i64>,
) -> Result<StatusCode> {
    if !state.db.delete_memo(user.user_id, memo_id)? {
        return Err(not_found(memo_id));
    }

    tracing::info!(user_id = user.user_id, memo_id, "Memo deleted");

    Ok(StatusCode::NO_CONTENT)
}
