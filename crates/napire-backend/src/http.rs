//! HTTP client for the napire inference service
//!
//! Talks JSON over HTTP to the four service endpoints. Non-success status
//! codes are surfaced as [`BackendError::Status`] so the orchestrator can
//! decide between fallback, notification and the lenient 404 policy.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::BackendError;
use crate::service::{BackendResult, InferenceBackend};
use crate::wire::{
    endpoints, Descriptions, InferenceRequest, ItemsReply, JobId, ModelDefinition, TaskReply,
};

/// Inference service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL the endpoint paths are appended to
    pub server_url: String,
    /// User agent sent with every request
    pub user_agent: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        let timeout_secs = std::env::var("NAPIRE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        BackendConfig {
            server_url: std::env::var("NAPIRE_SERVER")
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            user_agent: format!("napire-userweb/{}", env!("CARGO_PKG_VERSION")),
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl BackendConfig {
    /// Create a new config from environment variables
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Create config for a specific server
    pub fn new(server_url: &str) -> Self {
        BackendConfig {
            server_url: server_url.to_string(),
            ..Self::default()
        }
    }

    /// Override the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.server_url.trim_end_matches('/'), path)
    }
}

/// reqwest-backed [`InferenceBackend`]
pub struct HttpBackend {
    config: BackendConfig,
    http_client: reqwest::Client,
}

impl HttpBackend {
    /// Create a new HTTP backend
    pub fn new(config: BackendConfig) -> BackendResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BackendError::ClientSetup(e.to_string()))?;

        Ok(HttpBackend {
            config,
            http_client,
        })
    }

    /// Create backend from environment variables
    pub fn from_env() -> BackendResult<Self> {
        Self::new(BackendConfig::from_env())
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> BackendResult<T> {
        debug!(endpoint = path, "POST");
        let response = self
            .http_client
            .post(self.config.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::transport(path, e.to_string()))?;
        Self::decode(path, response).await
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> BackendResult<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::status(path, status.as_u16()));
        }

        response.json::<T>().await.map_err(|e| BackendError::Decode {
            endpoint: path.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl InferenceBackend for HttpBackend {
    async fn descriptions(&self, model: &ModelDefinition) -> BackendResult<Descriptions> {
        self.post(endpoints::DESCRIPTIONS, model).await
    }

    async fn items(&self, model: &ModelDefinition) -> BackendResult<ItemsReply> {
        self.post(endpoints::ITEMS, model).await
    }

    async fn infer(&self, request: &InferenceRequest) -> BackendResult<JobId> {
        self.post(endpoints::INFER, request).await
    }

    async fn task(&self, id: &JobId) -> BackendResult<TaskReply> {
        let path = endpoints::TASKS;
        debug!(endpoint = path, job_id = %id, "GET");
        let response = self
            .http_client
            .get(self.config.url(path))
            .query(&[("printresult", "true"), ("id", id.as_str())])
            .send()
            .await
            .map_err(|e| BackendError::transport(path, e.to_string()))?;
        Self::decode(path, response).await
    }
}
