// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod memo;
pub mod user;

pub use memo::{Memo, MemoPatch, NewMemo};
pub use user::{NewUser, User, UserProfile};
