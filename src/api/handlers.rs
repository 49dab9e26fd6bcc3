//! API Handlers
//!
//! HTTP request handlers for each profile cache endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::cache::{RefreshEngine, RefreshStats, MAX_BATCH_SIZE};
use crate::error::{RefreshError, Result};
use crate::lookup::UserLookup;
use crate::models::{CachedUserRecord, HealthResponse, ProbeQuery, StatsResponse};
use crate::storage::UserStore;

/// Application state shared across all handlers.
///
/// The engine itself is stateless; `stats` is the only state mutated per request.
#[derive(Clone)]
pub struct AppState {
    /// Refresh engine writing back to `store`
    pub engine: Arc<RefreshEngine>,
    /// User record storage
    pub store: Arc<dyn UserStore>,
    /// Refresh activity counters
    pub stats: Arc<RwLock<RefreshStats>>,
}

impl AppState {
    /// Creates a new AppState whose engine refreshes through `lookup` and
    /// persists into `store`.
    pub fn new(
        lookup: Arc<dyn UserLookup>,
        store: Arc<dyn UserStore>,
        threshold: chrono::Duration,
    ) -> Self {
        Self {
            engine: Arc::new(RefreshEngine::new(lookup, store.clone(), threshold)),
            store,
            stats: Arc::new(RwLock::new(RefreshStats::new())),
        }
    }
}

/// Handler for GET /users
///
/// Returns every stored user, newest first, with stale profiles refreshed.
/// The list is refreshed in windows of [`MAX_BATCH_SIZE`] records so no
/// single lookup call exceeds the batch limit.
pub async fn users_handler(State(state): State<AppState>) -> Result<Json<Vec<CachedUserRecord>>> {
    let store = state.store.clone();
    let users = tokio::task::spawn_blocking(move || store.list_users())
        .await
        .map_err(|e| RefreshError::Storage(e.to_string()))??;

    // Nothing stored yet: nothing to refresh
    if users.is_empty() {
        return Ok(Json(users));
    }

    let now = Utc::now();
    let mut windows = Vec::with_capacity(users.len().div_ceil(MAX_BATCH_SIZE));
    for window in users.chunks(MAX_BATCH_SIZE) {
        match state.engine.refresh_at(window.to_vec(), now).await {
            Ok(report) => windows.push(report),
            Err(err) => {
                state
                    .stats
                    .write()
                    .await
                    .record_failure(&windows, err.is_upstream());
                return Err(err);
            }
        }
    }

    state.stats.write().await.record_request(&windows);
    Ok(Json(
        windows.into_iter().flat_map(|report| report.users).collect(),
    ))
}

/// Handler for GET /test
///
/// Greets the caller named by `id`; rejects anonymous callers.
pub async fn probe_handler(Query(query): Query<ProbeQuery>) -> (StatusCode, String) {
    match query.caller() {
        Some(id) => (StatusCode::OK, format!("Hi! {}", id)),
        None => (StatusCode::BAD_REQUEST, "Who are you?".to_string()),
    }
}

/// Handler for GET /stats
///
/// Returns refresh statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.stats.read().await;
    Json(StatsResponse::from_stats(&stats))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::default_threshold;
    use crate::cache::test_support::{fresh, renamed, stale, ScriptedLookup};
    use crate::storage::SqliteUserStore;
    use chrono::Duration;

    fn state_with(lookup: Arc<ScriptedLookup>, users: &[CachedUserRecord]) -> AppState {
        let store = Arc::new(SqliteUserStore::open_in_memory().unwrap());
        for user in users {
            store.insert(user).unwrap();
        }
        AppState::new(lookup, store, default_threshold())
    }

    fn aged(mut record: CachedUserRecord, hours: i64) -> CachedUserRecord {
        record.cached_at = Utc::now() - Duration::hours(hours);
        record
    }

    #[tokio::test]
    async fn test_users_handler_empty_store() {
        let lookup = Arc::new(ScriptedLookup::returning(vec![]));
        let state = state_with(lookup.clone(), &[]);

        let Json(users) = users_handler(State(state)).await.unwrap();

        assert!(users.is_empty());
        assert_eq!(lookup.call_count(), 0);
    }

    #[tokio::test]
    async fn test_users_handler_refreshes_stale() {
        let lookup = Arc::new(ScriptedLookup::returning(vec![renamed("b")]));
        let state = state_with(
            lookup.clone(),
            &[aged(fresh("a"), 1), aged(stale("b"), 30)],
        );

        let Json(users) = users_handler(State(state.clone())).await.unwrap();

        assert_eq!(users.len(), 2);
        let b = users.iter().find(|u| u.id == "b").unwrap();
        assert_eq!(b.display_name, "Renamed b");
        assert_eq!(lookup.call_count(), 1);

        let stats = state.stats.read().await;
        assert_eq!(stats.requests, 1);
        assert_eq!(stats.records_refreshed, 1);
    }

    #[tokio::test]
    async fn test_users_handler_windows_large_stale_lists() {
        let lookup = Arc::new(ScriptedLookup::returning(vec![]));
        let users: Vec<_> = (0..150)
            .map(|i| aged(stale(&format!("u{:03}", i)), 30))
            .collect();
        let state = state_with(lookup.clone(), &users);

        let Json(refreshed) = users_handler(State(state.clone())).await.unwrap();

        assert_eq!(refreshed.len(), 150);
        assert_eq!(lookup.call_count(), 2);
        let calls = lookup.calls.lock().unwrap();
        assert_eq!(calls[0].split(',').count(), MAX_BATCH_SIZE);
        assert_eq!(calls[1].split(',').count(), 50);

        let stats = state.stats.read().await;
        assert_eq!(stats.requests, 1);
        assert_eq!(stats.external_calls, 2);
        assert_eq!(stats.records_kept_stale, 150);
    }

    #[tokio::test]
    async fn test_users_handler_counts_failures() {
        let lookup = Arc::new(ScriptedLookup::failing(88, "Rate limit exceeded"));
        let state = state_with(lookup, &[aged(stale("a"), 30)]);

        let result = users_handler(State(state.clone())).await;

        assert!(matches!(
            result,
            Err(RefreshError::UnknownExternalError { code: 88, .. })
        ));
        assert_eq!(state.stats.read().await.failures, 1);
    }

    #[tokio::test]
    async fn test_probe_handler_with_id() {
        let query = ProbeQuery {
            id: Some("ezaki".to_string()),
        };
        let (status, body) = probe_handler(Query(query)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Hi! ezaki");
    }

    #[tokio::test]
    async fn test_probe_handler_without_id() {
        let (status, body) = probe_handler(Query(ProbeQuery::default())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Who are you?");
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = state_with(Arc::new(ScriptedLookup::returning(vec![])), &[]);

        let response = stats_handler(State(state)).await;
        assert_eq!(response.requests, 0);
        assert_eq!(response.cache_rate, 0.0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
