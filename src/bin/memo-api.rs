// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Memo API Server
//!
//! Serves owner-scoped memo CRUD to clients holding an access token issued
//! by the identity service.

use memo_backend::{
    config::Config, db::MemoDb, logging::init_logging, routes::create_memo_router, MemoState,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.memo_port,
        algorithm = ?config.jwt_algorithm,
        "Starting Memo API"
    );

    let port = config.memo_port;
    let state = Arc::new(MemoState::new(config, MemoDb::new()));
    let app = create_memo_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
