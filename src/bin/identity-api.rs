// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity API Server
//!
//! Registers users and issues the access/refresh tokens the memo API
//! accepts.

use memo_backend::{
    config::Config, db::UserDb, logging::init_logging, routes::create_identity_router,
    IdentityState,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = Config::from_env()?;
    tracing::info!(
        port = config.identity_port,
        access_ttl_secs = config.access_token_ttl.num_seconds(),
        refresh_ttl_secs = config.refresh_token_ttl.num_seconds(),
        "Starting Identity API"
    );

    let port = config.identity_port;
    let state = Arc::new(IdentityState::new(config, UserDb::new()));
    let app = create_identity_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
