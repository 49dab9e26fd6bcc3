//! Response DTOs for the profile cache API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of refresh requests handled
    pub requests: u64,
    /// Requests answered without any external call
    pub served_from_cache: u64,
    /// Number of external lookup calls issued
    pub external_calls: u64,
    /// Records updated from the external source
    pub records_refreshed: u64,
    /// Stale records returned with their old values
    pub records_kept_stale: u64,
    /// Requests that failed with an error
    pub failures: u64,
    /// Share of requests served without an external call
    pub cache_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from refresh statistics
    pub fn from_stats(stats: &crate::cache::RefreshStats) -> Self {
        Self {
            requests: stats.requests,
            served_from_cache: stats.served_from_cache,
            external_calls: stats.external_calls,
            records_refreshed: stats.records_refreshed,
            records_kept_stale: stats.records_kept_stale,
            failures: stats.failures,
            cache_rate: stats.cache_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
    /// Upstream error code, when the lookup API reported one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: None,
        }
    }

    /// Creates an ErrorResponse carrying an upstream error code
    pub fn with_code(error: impl Into<String>, code: i64) -> Self {
        Self {
            error: error.into(),
            code: Some(code),
        }
    }
}
