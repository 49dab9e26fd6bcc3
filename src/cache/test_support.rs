//! Shared fixtures for refresh engine tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::lookup::{LookupError, LookupUser, UserLookup};
use crate::models::{CachedUserRecord, UserUpdate};
use crate::storage::{StorageError, UserStore};

/// Fixed "current time" used across engine tests.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 12, 24, 12, 0, 0).unwrap()
}

pub fn record_cached_at(id: &str, cached_at: DateTime<Utc>) -> CachedUserRecord {
    CachedUserRecord {
        id: id.to_string(),
        display_name: format!("User {}", id),
        handle: format!("user_{}", id),
        avatar_url: format!("https://img.example/{}.png", id),
        source_post_id: format!("post-{}", id),
        content: format!("post by {}", id),
        source_created_at: Utc.with_ymd_and_hms(2020, 12, 1, 0, 0, 0).unwrap(),
        cached_at,
    }
}

pub fn fresh(id: &str) -> CachedUserRecord {
    record_cached_at(id, now() - Duration::hours(23))
}

pub fn stale(id: &str) -> CachedUserRecord {
    record_cached_at(id, now() - Duration::hours(25))
}

/// Upstream profile for `id` with a renamed display name.
pub fn renamed(id: &str) -> LookupUser {
    LookupUser {
        id: id.to_string(),
        display_name: format!("Renamed {}", id),
        handle: format!("renamed_{}", id),
        avatar_url: format!("https://img.example/{}-new.png", id),
    }
}

/// Lookup that replays one scripted response and records every call.
pub struct ScriptedLookup {
    response: Result<Option<Vec<LookupUser>>, LookupError>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedLookup {
    pub fn returning(users: Vec<LookupUser>) -> Self {
        Self::with_response(Ok(Some(users)))
    }

    pub fn failing(code: i64, message: &str) -> Self {
        Self::with_response(Err(LookupError::Api {
            code,
            message: message.to_string(),
        }))
    }

    pub fn with_response(response: Result<Option<Vec<LookupUser>>, LookupError>) -> Self {
        Self {
            response,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl UserLookup for ScriptedLookup {
    async fn lookup_users(&self, ids: &str) -> Result<Option<Vec<LookupUser>>, LookupError> {
        self.calls.lock().unwrap().push(ids.to_string());
        self.response.clone()
    }
}

/// Store that records updates and can be told to fail them.
#[derive(Default)]
pub struct RecordingStore {
    pub updates: Mutex<Vec<UserUpdate>>,
    pub fail_updates: bool,
}

impl RecordingStore {
    pub fn failing() -> Self {
        Self {
            fail_updates: true,
            ..Default::default()
        }
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }
}

impl UserStore for RecordingStore {
    fn update(&self, update: &UserUpdate) -> Result<(), StorageError> {
        if self.fail_updates {
            return Err(StorageError::LockPoisoned);
        }
        self.updates.lock().unwrap().push(update.clone());
        Ok(())
    }

    fn list_users(&self) -> Result<Vec<CachedUserRecord>, StorageError> {
        Ok(Vec::new())
    }

    fn insert(&self, _record: &CachedUserRecord) -> Result<bool, StorageError> {
        Ok(true)
    }
}
