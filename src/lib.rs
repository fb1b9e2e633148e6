// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Memo backend: an identity service that issues JWTs and a memo service
//! that accepts them.
//!
//! The two services share nothing at runtime except the token format and
//! the signing configuration. Each has its own state, store and router.

pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::{MemoDb, UserDb};
use services::TokenService;
use std::sync::Arc;

/// Shared state of the memo service.
pub struct MemoState {
    pub config: Config,
    pub db: MemoDb,
    pub tokens: Arc<TokenService>,
}

/// Shared state of the identity service.
pub struct IdentityState {
    pub config: Config,
    pub users: UserDb,
    pub tokens: Arc<TokenService>,
}

impl MemoState {
    pub fn new(config: Config, db: MemoDb) -> Self {
        let tokens = Arc::new(TokenService::from_config(&config));
        Self { config, db, tokens }
    }
}

impl IdentityState {
    pub fn new(config: Config, users: UserDb) -> Self {
        let tokens = Arc::new(TokenService::from_config(&config));
        Self {
            config,
            users,
            tokens,
        }
    }
}
