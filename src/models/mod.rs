//! Data models for the profile cache
//!
//! This module defines the cached user record and the DTOs used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;
pub mod user;

// Re-export commonly used types
pub use requests::ProbeQuery;
pub use responses::{ErrorResponse, HealthResponse, StatsResponse};
pub use user::{CachedUserRecord, UserUpdate};
