//! API Module
//!
//! HTTP handlers and routing for the profile cache REST API.
//!
//! # Endpoints
//! - `GET /users` - Cached users with stale profiles refreshed
//! - `GET /test` - Liveness probe
//! - `GET /stats` - Refresh statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
