//! Storage layer.
//!
//! Each service owns its record store. Stores are in-process concurrent maps
//! with per-key locking; every public operation is a single atomic step.

pub mod memos;
pub mod users;

pub use memos::MemoDb;
pub use users::UserDb;

/// Error returned by every operation on a store built with `new_offline()`.
pub(crate) const OFFLINE: &str = "Database not connected (offline mode)";
