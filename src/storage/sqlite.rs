//! SQLite implementation of [`UserStore`].

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode};

use super::{StorageError, UserStore};
use crate::models::{CachedUserRecord, UserUpdate};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    source_post_id TEXT NOT NULL,
    content TEXT NOT NULL,
    source_created_at TEXT NOT NULL,
    display_name TEXT NOT NULL,
    handle TEXT NOT NULL,
    avatar_url TEXT NOT NULL,
    cached_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_users_source_created ON users(source_created_at);
";

/// SQLite-backed user store.
pub struct SqliteUserStore {
    conn: Mutex<Connection>,
}

impl SqliteUserStore {
    /// Open or create the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        Self::with_connection(Connection::open(path)?)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

impl UserStore for SqliteUserStore {
    fn update(&self, update: &UserUpdate) -> Result<(), StorageError> {
        self.conn()?.execute(
            "UPDATE users SET display_name = ?1, handle = ?2, avatar_url = ?3, cached_at = ?4
             WHERE id = ?5",
            params![
                update.display_name,
                update.handle,
                update.avatar_url,
                format_datetime(&update.cached_at),
                update.id,
            ],
        )?;
        Ok(())
    }

    fn list_users(&self) -> Result<Vec<CachedUserRecord>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, display_name, handle, avatar_url, source_post_id, content,
                    source_created_at, cached_at
             FROM users
             ORDER BY source_created_at DESC, id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
                row.get::<_, String>(7)?,
            ))
        })?;

        let mut users = Vec::new();
        for row in rows {
            let (id, display_name, handle, avatar_url, source_post_id, content, created, cached) =
                row?;
            users.push(CachedUserRecord {
                id,
                display_name,
                handle,
                avatar_url,
                source_post_id,
                content,
                source_created_at: parse_datetime(&created)?,
                cached_at: parse_datetime(&cached)?,
            });
        }
        Ok(users)
    }

    fn insert(&self, record: &CachedUserRecord) -> Result<bool, StorageError> {
        let result = self.conn()?.execute(
            "INSERT INTO users (id, source_post_id, content, source_created_at, display_name,
                                handle, avatar_url, cached_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.id,
                record.source_post_id,
                record.content,
                format_datetime(&record.source_created_at),
                record.display_name,
                record.handle,
                record.avatar_url,
                format_datetime(&record.cached_at),
            ],
        );

        match result {
            Ok(_) => Ok(true),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}

// Fixed-width RFC 3339 so lexical order in SQLite matches chronological order.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::CorruptTimestamp {
            value: s.to_string(),
            reason: e.to_string(),
        })
}
