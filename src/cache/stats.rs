//! Refresh Statistics Module
//!
//! Tracks how often requests are served from cache versus refreshed upstream.

use serde::Serialize;

use super::engine::RefreshReport;

// == Refresh Stats ==
/// Tracks refresh engine activity.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefreshStats {
    /// Number of refresh requests handled
    pub requests: u64,
    /// Requests answered without an external call
    pub served_from_cache: u64,
    /// External lookup calls issued
    pub external_calls: u64,
    /// Records updated from the external source
    pub records_refreshed: u64,
    /// Stale records returned with their cached values
    pub records_kept_stale: u64,
    /// Requests that ended in an error
    pub failures: u64,
}

impl RefreshStats {
    // == Constructor ==
    /// Creates a new RefreshStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Cache Rate ==
    /// Returns served_from_cache / requests, or 0.0 if no requests have been made.
    pub fn cache_rate(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            self.served_from_cache as f64 / self.requests as f64
        }
    }

    // == Record Request ==
    /// Folds one successful request into the counters. Large requests are
    /// refreshed in several windows; each window reports separately.
    pub fn record_request(&mut self, windows: &[RefreshReport]) {
        self.requests += 1;
        if !windows.iter().any(|report| report.external_call) {
            self.served_from_cache += 1;
        }
        self.fold_windows(windows);
    }

    // == Record Failure ==
    /// Counts a failed request. `windows` are the windows that completed
    /// before the failure; `failed_upstream` is true when the failure came
    /// back from the lookup.
    pub fn record_failure(&mut self, windows: &[RefreshReport], failed_upstream: bool) {
        self.requests += 1;
        self.failures += 1;
        if failed_upstream {
            self.external_calls += 1;
        }
        self.fold_windows(windows);
    }

    fn fold_windows(&mut self, windows: &[RefreshReport]) {
        for report in windows {
            if report.external_call {
                self.external_calls += 1;
            }
            self.records_refreshed += report.refreshed_count as u64;
            self.records_kept_stale +=
                report.stale_count.saturating_sub(report.refreshed_count) as u64;
        }
    }
}
