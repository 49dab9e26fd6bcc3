//! Persistence Task
//!
//! Background task that writes refreshed user records back to storage.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::models::UserUpdate;
use crate::storage::UserStore;

/// Spawns a background task that applies `updates` to the store.
///
/// Writes run on the blocking pool. Failures are logged and otherwise
/// ignored: the caller already holds the merged result, and a record whose
/// write is lost simply looks stale again on the next request.
///
/// # Returns
/// A JoinHandle for the spawned task. Dropping it leaves the writes running.
///
/// # Example
/// ```ignore
/// let updates = refreshed.iter().map(CachedUserRecord::to_update).collect();
/// spawn_persist_task(store.clone(), updates);
/// ```
pub fn spawn_persist_task(store: Arc<dyn UserStore>, updates: Vec<UserUpdate>) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let total = updates.len();
        let mut failed = 0;

        for update in &updates {
            if let Err(e) = store.update(update) {
                failed += 1;
                warn!("Failed to persist refreshed user {}: {}", update.id, e);
            }
        }

        if failed > 0 {
            warn!("Persisted {} of {} refreshed users", total - failed, total);
        } else {
            debug!("Persisted {} refreshed users", total);
        }
    })
}
