// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use memo_backend::config::Config;
use memo_backend::db::{MemoDb, UserDb};
use memo_backend::routes::{create_identity_router, create_memo_router};
use memo_backend::{IdentityState, MemoState};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;

/// Current Unix time in seconds.
#[allow(dead_code)]
pub fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Sign arbitrary claims with HS256.
#[allow(dead_code)]
pub fn sign_claims(claims: &Value, signing_key: &[u8]) -> String {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(signing_key),
    )
    .unwrap()
}

/// Create a test access token valid for a day.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: i64, signing_key: &[u8]) -> String {
    let now = now();
    sign_claims(
        &json!({
            "token_type": "access",
            "user_id": user_id,
            "iat": now,
            "exp": now + 86400,
        }),
        signing_key,
    )
}

/// Create a memo service app backed by an empty in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_memo_app() -> (Router, Arc<MemoState>) {
    let state = Arc::new(MemoState::new(Config::test_default(), MemoDb::new()));
    (create_memo_router(state.clone()), state)
}

/// Create a memo service app whose store is offline.
#[allow(dead_code)]
pub fn create_offline_memo_app() -> (Router, Arc<MemoState>) {
    let state = Arc::new(MemoState::new(
        Config::test_default(),
        MemoDb::new_offline(),
    ));
    (create_memo_router(state.clone()), state)
}

/// Create an identity service app backed by an empty in-memory store.
#[allow(dead_code)]
pub fn create_identity_app() -> (Router, Arc<IdentityState>) {
    let state = Arc::new(IdentityState::new(Config::test_default(), UserDb::new()));
    (create_identity_router(state.clone()), state)
}

/// Send a request and return the status and JSON body (`Null` if empty).
#[allow(dead_code)]
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

/// Register a user and return (user_id, access, refresh).
#[allow(dead_code)]
pub async fn register(app: &Router, username: &str, password: &str) -> (i64, String, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "username": username,
            "password": password,
            "password2": password,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "registration failed: {body}");

    (
        body["user"]["id"].as_i64().unwrap(),
        body["access"].as_str().unwrap().to_string(),
        body["refresh"].as_str().unwrap().to_string(),
    )
}
