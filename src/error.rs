//! Error types for the profile cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Refresh Error Enum ==
/// Unified error type for the refresh engine and the HTTP surface.
///
/// A lookup that reports the users as absent is not an error; see
/// [`crate::cache::RefreshOutcome::UsersAbsent`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefreshError {
    /// Caller supplied zero records
    #[error("Users array cannot be empty")]
    EmptyInput,

    /// Stale subset exceeds the lookup's per-call identifier limit
    #[error("Batch of {size} users exceeds the lookup limit of {max}")]
    BatchTooLarge { size: usize, max: usize },

    /// Lookup reported an error other than "users absent"
    #[error("Unknown lookup error, code:{code} message:{message}")]
    UnknownExternalError { code: i64, message: String },

    /// Lookup produced no usable response
    #[error("Lookup unavailable: {0}")]
    LookupUnavailable(String),

    /// Storage read failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl RefreshError {
    /// True when the error came back from a lookup call that was actually made.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            RefreshError::UnknownExternalError { .. } | RefreshError::LookupUnavailable(_)
        )
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for RefreshError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, body) = match &self {
            RefreshError::EmptyInput | RefreshError::BatchTooLarge { .. } => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(message))
            }
            RefreshError::UnknownExternalError { code, .. } => {
                (StatusCode::BAD_GATEWAY, ErrorResponse::with_code(message, *code))
            }
            RefreshError::LookupUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, ErrorResponse::new(message))
            }
            RefreshError::Storage(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new(message))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<crate::storage::StorageError> for RefreshError {
    fn from(err: crate::storage::StorageError) -> Self {
        RefreshError::Storage(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the profile cache.
pub type Result<T> = std::result::Result<T, RefreshError>;
