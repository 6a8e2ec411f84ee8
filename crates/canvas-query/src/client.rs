//! Upstream Canvas REST client.
//!
//! Every query goes through the [`CanvasApi`] trait so handlers can be driven
//! by an in-memory fake in tests. [`CanvasClient`] is the reqwest-backed
//! implementation used in production.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::types::{CanvasError, CanvasResult};

/// Base URL used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "https://canvas.instructure.com";

/// Path prefix of the Canvas REST API.
pub const API_PREFIX: &str = "api/v1";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Read-only access to Canvas REST endpoints.
#[async_trait]
pub trait CanvasApi: Send + Sync {
    /// GET `endpoint` (relative to `/api/v1/`) and decode the JSON body.
    async fn get_json(&self, endpoint: &str) -> CanvasResult<Value>;
}

/// GET an endpoint and decode it into a typed model.
pub async fn fetch<T: DeserializeOwned>(api: &dyn CanvasApi, endpoint: &str) -> CanvasResult<T> {
    let value = api.get_json(endpoint).await?;
    Ok(serde_json::from_value(value)?)
}

/// Connection settings for [`CanvasClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(token: Option<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Authenticated HTTP client for the Canvas REST API.
#[derive(Debug, Clone)]
pub struct CanvasClient {
    http: reqwest::Client,
    base_url: String,
}

impl CanvasClient {
    /// Build a client. Fails before any network activity when no token is set.
    pub fn new(config: ClientConfig) -> CanvasResult<Self> {
        let token = config
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                CanvasError::Config(
                    "Canvas access token is required (set CANVAS_API_TOKEN or pass --token)"
                        .to_string(),
                )
            })?;

        let mut auth = header::HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| CanvasError::Config("Access token contains invalid characters".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(CanvasError::Config("Canvas base URL must not be empty".to_string()));
        }

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint relative to `/api/v1/`.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{API_PREFIX}/{}",
            self.base_url,
            endpoint.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl CanvasApi for CanvasClient {
    async fn get_json(&self, endpoint: &str) -> CanvasResult<Value> {
        let url = self.endpoint_url(endpoint);
        debug!(url = %url, "GET request");

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), endpoint, "Canvas request failed");
            return Err(CanvasError::from_response(status.as_u16(), &body));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
