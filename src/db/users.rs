//! User store for the identity service.

use crate::db::OFFLINE;
use crate::error::AppError;
use crate::models::User;
use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

struct UserTables {
    users: DashMap<i64, User>,
    /// Username → user ID; doubles as the uniqueness constraint
    usernames: DashMap<String, i64>,
    next_id: AtomicI64,
}

/// User database handle. Cheap to clone; clones share the same records.
#[derive(Clone)]
pub struct UserDb {
    tables: Option<Arc<UserTables>>,
}

impl Default for UserDb {
    fn default() -> Self {
        Self::new()
    }
}

impl UserDb {
    pub fn new() -> Self {
        Self {
            tables: Some(Arc::new(UserTables {
                users: DashMap::new(),
                usernames: DashMap::new(),
                next_id: AtomicI64::new(1),
            })),
        }
    }

    /// Create a store that is not connected (for testing failure paths).
    pub fn new_offline() -> Self {
        Self { tables: None }
    }

    fn tables(&self) -> Result<&UserTables, AppError> {
        self.tables
            .as_deref()
            .ok_or_else(|| AppError::Database(OFFLINE.to_string()))
    }

    /// Insert a user, failing with `Conflict` if the username is taken.
    ///
    /// The username slot stays locked until the user record is written, so
    /// two concurrent registrations of the same name cannot both succeed.
    pub fn insert_user(
        &self,
        username: &str,
        email: Option<String>,
        password_hash: String,
        now: DateTime<Utc>,
    ) -> Result<User, AppError> {
        let tables = self.tables()?;

        match tables.usernames.entry(username.to_string()) {
            Entry::Occupied(_) => Err(AppError::Conflict(
                "A user with that username already exists".to_string(),
            )),
            Entry::Vacant(slot) => {
                let id = tables.next_id.fetch_add(1, Ordering::Relaxed);
                let user = User {
                    id,
                    username: username.to_string(),
                    email,
                    password_hash,
                    date_joined: now,
                };
                tables.users.insert(id, user.clone());
                slot.insert(id);
                Ok(user)
            }
        }
    }

    /// Get a user by ID.
    pub fn get_user(&self, user_id: i64) -> Result<Option<User>, AppError> {
        Ok(self
            .tables()?
            .users
            .get(&user_id)
            .map(|user| user.value().clone()))
    }

    /// Get a user by exact (case-sensitive) username.
    pub fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables()?;
        let Some(user_id) = tables.usernames.get(username).map(|id| *id.value()) else {
            return Ok(None);
        };
        Ok(tables.users.get(&user_id).map(|user| user.value().clone()))
    }
}
