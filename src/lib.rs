//! Profile Cache - A cached user profile service
//!
//! Serves locally cached user profiles, refreshing stale entries from a
//! rate-limited batch lookup API while preserving list order.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod lookup;
pub mod models;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use cache::RefreshEngine;
pub use config::Config;
pub use error::RefreshError;
