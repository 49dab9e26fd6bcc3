//! HTTP lookup adapter for a Twitter-style `users/lookup` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{LookupError, LookupUser, UserLookup};
use crate::config::Config;

// == API Response Types ==

#[derive(Debug, Deserialize)]
struct ApiUser {
    id_str: String,
    name: String,
    screen_name: String,
    profile_image_url_https: String,
}

impl From<ApiUser> for LookupUser {
    fn from(user: ApiUser) -> Self {
        Self {
            id: user.id_str,
            display_name: user.name,
            handle: user.screen_name,
            avatar_url: user.profile_image_url_https,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: i64,
    #[serde(default)]
    message: String,
}

/// The API reports errors as `{"errors": [...]}`, a bare list, or a single object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiErrorBody {
    Wrapped { errors: Vec<ApiError> },
    List(Vec<ApiError>),
    Single(ApiError),
}

impl ApiErrorBody {
    fn into_first(self) -> Option<ApiError> {
        match self {
            ApiErrorBody::Wrapped { errors } | ApiErrorBody::List(errors) => {
                errors.into_iter().next()
            }
            ApiErrorBody::Single(error) => Some(error),
        }
    }
}

// == Client ==

/// Lookup client with connection pooling and bearer authentication.
#[derive(Debug, Clone)]
pub struct HttpUserLookup {
    client: reqwest::Client,
    base_url: String,
    bearer_token: String,
}

impl HttpUserLookup {
    pub fn new(
        base_url: impl Into<String>,
        bearer_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("profile_cache/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(4)
            .timeout(timeout)
            .build()
            .map_err(|e| LookupError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bearer_token: bearer_token.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, LookupError> {
        Self::new(
            config.lookup_base_url.clone(),
            config.lookup_bearer_token.clone(),
            Duration::from_secs(config.lookup_timeout),
        )
    }
}

#[async_trait]
impl UserLookup for HttpUserLookup {
    async fn lookup_users(&self, ids: &str) -> Result<Option<Vec<LookupUser>>, LookupError> {
        let url = format!("{}/1.1/users/lookup.json", self.base_url);
        debug!("Looking up users: {}", ids);

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .query(&[("user_id", ids), ("include_entities", "false")])
            .send()
            .await
            .map_err(|e| LookupError::Transport(format!("HTTP error: {}", e)))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| LookupError::Transport(format!("failed to read body: {}", e)))?;

        decode_body(status, &body)
    }
}

/// Decodes a lookup response body into users, an absent result, or a
/// normalized error.
fn decode_body(status: u16, body: &str) -> Result<Option<Vec<LookupUser>>, LookupError> {
    if body.trim().is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(body).map_err(|e| {
        LookupError::Transport(format!(
            "lookup returned {} with undecodable body: {}",
            status, e
        ))
    })?;
    if value.is_null() {
        return Ok(None);
    }

    if let Some(error) = ApiErrorBody::deserialize(&value)
        .ok()
        .and_then(ApiErrorBody::into_first)
    {
        return Err(LookupError::Api {
            code: error.code,
            message: error.message,
        });
    }

    if !(200..300).contains(&status) {
        return Err(LookupError::Transport(format!(
            "lookup returned {}: {}",
            status,
            body.chars().take(500).collect::<String>()
        )));
    }

    let users: Vec<ApiUser> = serde_json::from_value(value)
        .map_err(|e| LookupError::Transport(format!("JSON parse error: {}", e)))?;

    Ok(Some(users.into_iter().map(LookupUser::from).collect()))
}
