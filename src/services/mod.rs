// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - token signing and password hashing.

pub mod passwords;
pub mod tokens;

pub use tokens::{Claims, TokenError, TokenKind, TokenPair, TokenService};
