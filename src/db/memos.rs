// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Memo store with owner-scoped operations.
//!
//! No lookup here takes a memo ID without the owner's user ID: a memo owned
//! by someone else is indistinguishable from one that does not exist.

use crate::db::OFFLINE;
use crate::error::AppError;
use crate::models::{Memo, MemoPatch, NewMemo};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

struct MemoTables {
    memos: DashMap<i64, Memo>,
    next_id: AtomicI64,
}

/// Memo database handle. Cheap to clone; clones share the same records.
#[derive(Clone)]
pub struct MemoDb {
    tables: Option<Arc<MemoTables>>,
}

impl Default for MemoDb {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoDb {
    /// Create an empty store. IDs start at 1.
    pub fn new() -> Self {
        Self {
            tables: Some(Arc::new(MemoTables {
                memos: DashMap::new(),
                next_id: AtomicI64::new(1),
            })),
        }
    }

    /// Create a store that is not connected (for testing failure paths).
    ///
    /// All database operations will return an error if called.
    pub fn new_offline() -> Self {
        Self { tables: None }
    }

    fn tables(&self) -> Result<&MemoTables, AppError> {
        self.tables
            .as_deref()
            .ok_or_else(|| AppError::Database(OFFLINE.to_string()))
    }

    /// Insert a new memo owned by `user_id`.
    pub fn create_memo(
        &self,
        user_id: i64,
        memo: NewMemo,
        now: DateTime<Utc>,
    ) -> Result<Memo, AppError> {
        let tables = self.tables()?;
        let id = tables.next_id.fetch_add(1, Ordering::Relaxed);

        let memo = Memo {
            id,
            user_id,
            title: memo.title,
            content: memo.content,
            created_at: now,
            updated_at: None,
        };
        tables.memos.insert(id, memo.clone());

        Ok(memo)
    }

    /// List a user's memos in ascending ID order.
    pub fn list_memos(
        &self,
        user_id: i64,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<Memo>, AppError> {
        let mut memos: Vec<Memo> = self
            .tables()?
            .memos
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();

        memos.sort_by_key(|m| m.id);

        Ok(memos.into_iter().skip(skip).take(limit).collect())
    }

    /// Get a memo by ID if it belongs to `user_id`.
    pub fn get_memo(&self, user_id: i64, memo_id: i64) -> Result<Option<Memo>, AppError> {
        Ok(self
            .tables()?
            .memos
            .get(&memo_id)
            .filter(|memo| memo.user_id == user_id)
            .map(|memo| memo.value().clone()))
    }

    /// Apply a partial update to a memo owned by `user_id`.
    ///
    /// The ownership check and the write happen under the same entry lock.
    pub fn update_memo(
        &self,
        user_id: i64,
        memo_id: i64,
        patch: MemoPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Memo>, AppError> {
        let tables = self.tables()?;
        let Some(mut memo) = tables.memos.get_mut(&memo_id) else {
            return Ok(None);
        };
        if memo.user_id != user_id {
            return Ok(None);
        }

        memo.apply(patch, now);
        Ok(Some(memo.value().clone()))
    }

    /// Delete a memo owned by `user_id`. Returns whether anything was removed.
    pub fn delete_memo(&self, user_id: i64, memo_id: i64) -> Result<bool, AppError> {
        Ok(self
            .tables()?
            .memos
            .remove_if(&memo_id, |_, memo| memo.user_id == user_id)
            .is_some())
    }
}
