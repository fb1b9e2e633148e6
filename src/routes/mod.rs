// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod identity;
pub mod memos;

use crate::middleware::auth::require_auth;
use crate::{IdentityState, MemoState};
use axum::http::{header, HeaderValue, Method};
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Service banner for the memo API root.
async fn memo_root() -> Json<Value> {
    Json(json!({
        "message": "JWT Memo API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "memos": "/api/memos",
            "health": "/health",
        },
    }))
}

/// CORS layer - allow requests from frontend URL and localhost (for dev)
fn cors_layer(frontend_url: String) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
}

/// Security headers, CORS and request tracing, shared by both services.
fn with_common_layers<S>(router: Router<S>, frontend_url: String) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors_layer(frontend_url))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Build the memo service router.
pub fn create_memo_router(state: Arc<MemoState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", get(memo_root))
        .route("/health", get(health_check));

    // Every memo route requires an access token
    let protected_routes = memos::routes().route_layer(middleware::from_fn_with_state(
        state.tokens.clone(),
        require_auth,
    ));

    let router = Router::new().merge(public_routes).merge(protected_routes);

    with_common_layers(router, state.config.frontend_url.clone()).with_state(state)
}

/// Build the identity service router.
pub fn create_identity_router(state: Arc<IdentityState>) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .merge(identity::public_routes());

    let protected_routes = identity::protected_routes().route_layer(
        middleware::from_fn_with_state(state.tokens.clone(), require_auth),
    );

    let router = Router::new().merge(public_routes).merge(protected_routes);

    with_common_layers(router, state.config.frontend_url.clone()).with_state(state)
}
