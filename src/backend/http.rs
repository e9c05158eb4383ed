//! HTTP implementation of the decision service backend
//!
//! Speaks the JSON API under `<base_url>/api`. No timeout is applied to
//! requests; a pending query stays pending until the transport settles it.

use crate::backend::{
    Backend, DocumentInfo, HealthStatus, QueryRequest, QueryResponse, ServerHistoryRecord,
    StatsSnapshot,
};
use crate::config::BackendConfig;
use crate::error::{BackendError, ClaimdeskError};

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

/// Decision service reached over HTTP
///
/// # Examples
///
/// ```
/// use claimdesk::backend::HttpBackend;
/// use claimdesk::config::BackendConfig;
///
/// let config = BackendConfig {
///     base_url: "http://localhost:8001".to_string(),
///     ..Default::default()
/// };
/// let backend = HttpBackend::new(&config).unwrap();
/// assert_eq!(backend.base_url(), "http://localhost:8001");
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend for the configured base URL
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: &BackendConfig) -> crate::error::Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ClaimdeskError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        tracing::info!("Initialized decision service backend: base_url={}", base_url);

        Ok(Self { client, base_url })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let url = self.endpoint(path);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            tracing::warn!("Request to {} failed: {}", url, e);
            BackendError::Transport(e.to_string())
        })?;

        decode(response, &url).await
    }
}

/// Check status and decode a JSON body
async fn decode<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, BackendError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!("Decision service returned error {} for {}: {}", status, url, body);
        return Err(BackendError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.text().await.map_err(|e| {
        tracing::warn!("Failed to read response body from {}: {}", url, e);
        BackendError::Transport(e.to_string())
    })?;

    serde_json::from_str(&body).map_err(|e| {
        tracing::error!("Failed to parse response from {}: {}", url, e);
        BackendError::Decode(e.to_string())
    })
}

#[async_trait]
impl Backend for HttpBackend {
    async fn stats(&self) -> Result<StatsSnapshot, BackendError> {
        self.get_json("stats").await
    }

    async fn documents(&self) -> Result<Vec<DocumentInfo>, BackendError> {
        self.get_json("documents").await
    }

    async fn submit_query(&self, request: &QueryRequest) -> Result<QueryResponse, BackendError> {
        let url = self.endpoint("query");
        tracing::debug!(
            session_id = %request.session_id,
            query_len = request.query.len(),
            "POST {}",
            url
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Query submission failed: {}", e);
                BackendError::Transport(e.to_string())
            })?;

        decode(response, &url).await
    }

    async fn health(&self) -> Result<HealthStatus, BackendError> {
        self.get_json("health").await
    }

    async fn session_history(
        &self,
        session_id: &str,
    ) -> Result<Vec<ServerHistoryRecord>, BackendError> {
        let mut url = url::Url::parse(&self.endpoint("session"))
            .map_err(|e| BackendError::Transport(format!("Invalid base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| BackendError::Transport("Base URL cannot be a base".to_string()))?
            .push(session_id)
            .push("history");

        tracing::debug!("GET {}", url);
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            tracing::warn!("Request to {} failed: {}", url, e);
            BackendError::Transport(e.to_string())
        })?;

        decode(response, url.as_str()).await
    }
}
