//! Batch Refresher Module
//!
//! Issues one lookup call for a bounded set of stale records and joins the
//! response back onto them by id.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use tracing::{debug, warn};

use crate::error::{RefreshError, Result};
use crate::lookup::{LookupError, LookupUser, UserLookup};
use crate::models::CachedUserRecord;

/// Maximum number of identifiers the lookup accepts per call.
pub const MAX_BATCH_SIZE: usize = 100;

/// Lookup error code meaning none of the requested users exist (or all are suspended).
pub const USERS_ABSENT_CODE: i64 = 17;

/// Result of a successful batch refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Records the lookup returned, in stale-subset order. Records the lookup
    /// omitted are absent.
    Refreshed(Vec<CachedUserRecord>),
    /// The lookup reported the users as absent; nothing was updated.
    UsersAbsent,
}

impl RefreshOutcome {
    pub fn into_records(self) -> Vec<CachedUserRecord> {
        match self {
            RefreshOutcome::Refreshed(records) => records,
            RefreshOutcome::UsersAbsent => Vec::new(),
        }
    }
}

/// Refreshes stale records through a [`UserLookup`].
#[derive(Clone)]
pub struct BatchRefresher {
    lookup: Arc<dyn UserLookup>,
}

impl BatchRefresher {
    pub fn new(lookup: Arc<dyn UserLookup>) -> Self {
        Self { lookup }
    }

    // == Refresh ==
    /// Looks up every record in `stale` with a single call.
    ///
    /// Refreshed records keep their provenance fields, take their profile
    /// fields from the lookup and share the time the lookup answered as
    /// their new `cached_at`. Empty input succeeds without a call; more than
    /// [`MAX_BATCH_SIZE`] records fail without a call.
    pub async fn refresh(&self, stale: &[CachedUserRecord]) -> Result<RefreshOutcome> {
        if stale.is_empty() {
            return Ok(RefreshOutcome::Refreshed(Vec::new()));
        }
        if stale.len() > MAX_BATCH_SIZE {
            return Err(RefreshError::BatchTooLarge {
                size: stale.len(),
                max: MAX_BATCH_SIZE,
            });
        }

        let ids = stale
            .iter()
            .map(|record| record.id.as_str())
            .collect::<Vec<_>>()
            .join(",");

        let users = match self.lookup.lookup_users(&ids).await {
            Ok(Some(users)) => users,
            Ok(None) => {
                warn!("Lookup returned no response for {} users", stale.len());
                return Err(RefreshError::LookupUnavailable(
                    "couldn't fetch users".to_string(),
                ));
            }
            Err(LookupError::Api { code, .. }) if code == USERS_ABSENT_CODE => {
                debug!("Lookup reported users absent for {} ids", stale.len());
                return Ok(RefreshOutcome::UsersAbsent);
            }
            Err(LookupError::Api { code, message }) => {
                warn!("Lookup failed with code {}: {}", code, message);
                return Err(RefreshError::UnknownExternalError { code, message });
            }
            Err(LookupError::Transport(reason)) => {
                warn!("Lookup transport failure: {}", reason);
                return Err(RefreshError::LookupUnavailable(reason));
            }
        };

        Ok(RefreshOutcome::Refreshed(join_by_id(
            stale,
            users,
            refresh_timestamp(),
        )))
    }
}

/// Current time at the precision the store keeps, so the returned and the
/// persisted `cached_at` agree.
fn refresh_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Joins lookup users onto input records by id. Unknown response ids are
/// ignored; inputs without a response are dropped.
fn join_by_id(
    stale: &[CachedUserRecord],
    users: Vec<LookupUser>,
    refreshed_at: DateTime<Utc>,
) -> Vec<CachedUserRecord> {
    let by_id: HashMap<String, LookupUser> =
        users.into_iter().map(|user| (user.id.clone(), user)).collect();

    stale
        .iter()
        .filter_map(|record| {
            let user = by_id.get(&record.id)?;
            Some(CachedUserRecord {
                id: record.id.clone(),
                display_name: user.display_name.clone(),
                handle: user.handle.clone(),
                avatar_url: user.avatar_url.clone(),
                source_post_id: record.source_post_id.clone(),
                content: record.content.clone(),
                source_created_at: record.source_created_at,
                cached_at: refreshed_at,
            })
        })
        .collect()
}
