//! Cache Module
//!
//! Selective refresh of cached user records: staleness evaluation,
//! partitioning, batched lookup of the stale subset, and order-preserving merge.

mod engine;
mod merge;
mod partition;
mod refresher;
mod staleness;
mod stats;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export public types
pub use engine::{RefreshEngine, RefreshReport};
pub use merge::merge;
pub use partition::{Freshness, Partition, Slot};
pub use refresher::{BatchRefresher, RefreshOutcome, MAX_BATCH_SIZE, USERS_ABSENT_CODE};
pub use staleness::{default_threshold, is_stale, DEFAULT_STALENESS_HOURS};
pub use stats::RefreshStats;
