//! Background Tasks Module
//!
//! Contains background tasks that run alongside request handling.
//!
//! # Tasks
//! - Persistence: writes refreshed user records back to storage

mod persist;

pub use persist::spawn_persist_task;
