//! Durable key-value backing store contract and adapters.
//!
//! # Responsibility
//! - Define the narrow synchronous `read`/`write` contract used by stores.
//! - Provide an in-memory adapter and a SQLite-backed on-device adapter.
//! - Own the fixed storage keys and the persisted payload codec.
//!
//! # Invariants
//! - A missing backing store (`None`) means "in-memory only"; it is never
//!   treated as a fatal condition by callers.
//! - `write` replaces the whole value for a key; there are no partial writes.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub mod codec;
pub mod keys;
mod memory;
mod sqlite;

pub use memory::MemoryBackingStore;
pub use sqlite::SqliteBackingStore;

pub type StorageResult<T> = Result<T, StorageError>;

/// Shared handle stores keep to their backing store, if any.
pub type SharedBackingStore = Arc<dyn BackingStore>;

/// Failure raised by a backing store adapter.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    Backend(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Backend(message) => write!(f, "backing store failure: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Backend(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Synchronous string-keyed storage scoped to the running device.
pub trait BackingStore: Send + Sync {
    /// Returns the raw value stored under `key`, or `None` when absent.
    fn read(&self, key: &str) -> StorageResult<Option<String>>;

    /// Overwrites the raw value stored under `key`.
    fn write(&self, key: &str, raw: &str) -> StorageResult<()>;
}
