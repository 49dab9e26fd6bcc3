//! Staleness Module
//!
//! Decides whether a cached record is due for a refresh.

use chrono::{DateTime, Duration, Utc};

use crate::models::CachedUserRecord;

/// Default age in hours after which a cached record is refreshed.
pub const DEFAULT_STALENESS_HOURS: i64 = 24;

/// Returns the default staleness threshold.
pub fn default_threshold() -> Duration {
    Duration::hours(DEFAULT_STALENESS_HOURS)
}

// == Is Stale ==
/// Checks if a record is due for a refresh.
///
/// Boundary condition: a record is stale once `cached_at + threshold <= now`,
/// so a record exactly `threshold` old is already stale.
pub fn is_stale(record: &CachedUserRecord, now: DateTime<Utc>, threshold: Duration) -> bool {
    match record.cached_at.checked_add_signed(threshold) {
        Some(expires) => expires <= now,
        // Past the representable range: never stale
        None => false,
    }
}
