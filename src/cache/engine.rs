//! Refresh Engine Module
//!
//! Returns a cached user list with stale entries refreshed, in input order.
//!
//! Flow: partition → batch refresh of the stale subset (at most one lookup
//! call) → fire-and-forget persistence of refreshed records → merge.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::merge::merge;
use super::partition::Partition;
use super::refresher::{BatchRefresher, RefreshOutcome, MAX_BATCH_SIZE};
use super::staleness::default_threshold;
use crate::error::{RefreshError, Result};
use crate::lookup::UserLookup;
use crate::models::CachedUserRecord;
use crate::storage::UserStore;
use crate::tasks::spawn_persist_task;

/// Merged result of one refresh plus what it took to produce it.
#[derive(Debug)]
pub struct RefreshReport {
    /// Records in input order
    pub users: Vec<CachedUserRecord>,
    /// Records found stale
    pub stale_count: usize,
    /// Stale records actually updated from the lookup
    pub refreshed_count: usize,
    /// Whether the lookup was called
    pub external_call: bool,
    /// Background persistence of the refreshed records, if any were written
    pub persist_handle: Option<JoinHandle<()>>,
}

/// Request-scoped refresh engine. Holds no cache state of its own; staleness
/// comes entirely from the `cached_at` of the records each call supplies.
#[derive(Clone)]
pub struct RefreshEngine {
    refresher: BatchRefresher,
    store: Arc<dyn UserStore>,
    threshold: Duration,
}

impl RefreshEngine {
    pub fn new(lookup: Arc<dyn UserLookup>, store: Arc<dyn UserStore>, threshold: Duration) -> Self {
        Self {
            refresher: BatchRefresher::new(lookup),
            store,
            threshold,
        }
    }

    /// Engine with the default 24 hour staleness threshold.
    pub fn with_default_threshold(lookup: Arc<dyn UserLookup>, store: Arc<dyn UserStore>) -> Self {
        Self::new(lookup, store, default_threshold())
    }

    // == Get Refreshed Users ==
    /// Returns `records` with every stale entry refreshed, same length and order.
    ///
    /// Persistence of refreshed records runs in the background and never
    /// affects the result.
    pub async fn get_refreshed_users(
        &self,
        records: Vec<CachedUserRecord>,
    ) -> Result<Vec<CachedUserRecord>> {
        self.refresh_at(records, Utc::now())
            .await
            .map(|report| report.users)
    }

    // == Refresh At ==
    /// Same as [`get_refreshed_users`](Self::get_refreshed_users) with an
    /// explicit staleness reference. Refreshed records are stamped with the
    /// time the lookup answered, not with `now`.
    pub async fn refresh_at(
        &self,
        records: Vec<CachedUserRecord>,
        now: DateTime<Utc>,
    ) -> Result<RefreshReport> {
        if records.is_empty() {
            return Err(RefreshError::EmptyInput);
        }

        let partition = Partition::new(records, now, self.threshold);
        let stale_count = partition.stale_count();
        debug!(
            "Partitioned {} users: {} stale, {} fresh",
            partition.len(),
            stale_count,
            partition.fresh_count()
        );

        if stale_count == 0 {
            debug!("All users fresh, serving from cache");
            return Ok(RefreshReport {
                users: partition.into_records(),
                stale_count: 0,
                refreshed_count: 0,
                external_call: false,
                persist_handle: None,
            });
        }
        if stale_count > MAX_BATCH_SIZE {
            return Err(RefreshError::BatchTooLarge {
                size: stale_count,
                max: MAX_BATCH_SIZE,
            });
        }

        let stale: Vec<CachedUserRecord> = partition.stale_records().cloned().collect();
        let refreshed = match self.refresher.refresh(&stale).await? {
            RefreshOutcome::Refreshed(records) => records,
            RefreshOutcome::UsersAbsent => {
                info!("Lookup reported {} stale users absent, keeping cached values", stale_count);
                Vec::new()
            }
        };
        let refreshed_count = refreshed.len();

        let persist_handle = if refreshed.is_empty() {
            None
        } else {
            let updates = refreshed.iter().map(CachedUserRecord::to_update).collect();
            Some(spawn_persist_task(self.store.clone(), updates))
        };

        let users = merge(partition, refreshed);
        info!(
            "Refreshed {} of {} stale users ({} total)",
            refreshed_count,
            stale_count,
            users.len()
        );

        Ok(RefreshReport {
            users,
            stale_count,
            refreshed_count,
            external_call: true,
            persist_handle,
        })
    }
}
