//! Storage Module
//!
//! Durable home of cached user records. The refresh engine only ever writes
//! keyed updates through [`UserStore::update`]; reads feed the HTTP layer.

mod sqlite;

use thiserror::Error;

use crate::models::{CachedUserRecord, UserUpdate};

pub use sqlite::SqliteUserStore;

/// Storage failure.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("failed to create database directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt timestamp '{value}': {reason}")]
    CorruptTimestamp { value: String, reason: String },

    #[error("storage lock poisoned")]
    LockPoisoned,
}

/// Trait for user record storage backends.
///
/// Writes are keyed by user id; concurrent updates to the same id resolve
/// last-write-wins.
pub trait UserStore: Send + Sync {
    /// Apply a refresh to the record with `update.id`. Missing ids are a no-op.
    fn update(&self, update: &UserUpdate) -> Result<(), StorageError>;

    /// All stored records, newest introducing post first.
    fn list_users(&self) -> Result<Vec<CachedUserRecord>, StorageError>;

    /// Insert a new record. Returns false if the id is already stored.
    fn insert(&self, record: &CachedUserRecord) -> Result<bool, StorageError>;
}
