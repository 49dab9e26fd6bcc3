//! User Record Models
//!
//! The cached user record the refresh engine works on, and the keyed update
//! written back to storage after a refresh.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Cached User Record ==
/// A locally cached user profile.
///
/// `display_name`, `handle` and `avatar_url` mirror the external source as of
/// `cached_at`. `source_post_id`, `content` and `source_created_at` describe
/// the post that introduced the user and are never refreshed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedUserRecord {
    /// External user identifier
    pub id: String,
    /// Display name as last seen upstream
    pub display_name: String,
    /// Screen handle as last seen upstream
    pub handle: String,
    /// Avatar image URL as last seen upstream
    pub avatar_url: String,
    /// Identifier of the post that introduced this user
    pub source_post_id: String,
    /// Text of the post that introduced this user
    pub content: String,
    /// Creation time of the introducing post
    pub source_created_at: DateTime<Utc>,
    /// Last successful refresh (or initial insert)
    pub cached_at: DateTime<Utc>,
}

impl CachedUserRecord {
    /// Builds the storage update carrying this record's mutable fields.
    pub fn to_update(&self) -> UserUpdate {
        UserUpdate {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
            handle: self.handle.clone(),
            avatar_url: self.avatar_url.clone(),
            cached_at: self.cached_at,
        }
    }
}

// == User Update ==
/// Keyed update applied to a stored record after a successful refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    pub id: String,
    pub display_name: String,
    pub handle: String,
    pub avatar_url: String,
    pub cached_at: DateTime<Utc>,
}
