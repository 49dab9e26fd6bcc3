//! Request DTOs for the profile cache API
//!
//! Defines the structure of incoming query parameters.

use serde::Deserialize;

/// Query parameters for the liveness probe (GET /test)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeQuery {
    /// Caller identifier echoed back in the greeting
    #[serde(default)]
    pub id: Option<String>,
}

impl ProbeQuery {
    /// Returns the caller identifier, treating an empty value as absent.
    pub fn caller(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}
