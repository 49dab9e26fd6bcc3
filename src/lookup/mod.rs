//! Lookup Module
//!
//! Boundary to the external batch user lookup API. Adapters normalize every
//! failure shape the API produces into [`LookupError`] before it reaches the
//! refresh engine.

mod rest;

use async_trait::async_trait;
use thiserror::Error;

pub use rest::HttpUserLookup;

/// Profile fields returned by the lookup API for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupUser {
    pub id: String,
    pub display_name: String,
    pub handle: String,
    pub avatar_url: String,
}

/// Normalized lookup failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Structured error reported by the API
    #[error("lookup api error {code}: {message}")]
    Api { code: i64, message: String },

    /// The call produced no usable response
    #[error("lookup transport failure: {0}")]
    Transport(String),
}

/// Batch lookup of user profiles by identifier.
///
/// `ids` is a comma-joined list of at most 100 identifiers. `Ok(None)` means
/// the API answered with an empty (null) body. Implementations own their
/// retry and timeout policy; the engine calls `lookup_users` exactly once per
/// refresh.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn lookup_users(&self, ids: &str) -> Result<Option<Vec<LookupUser>>, LookupError>;
}
