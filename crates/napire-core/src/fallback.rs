//! Bundled sample payloads substituted when the service is unreachable.
//!
//! Payloads are keyed by endpoint path. A failing call whose endpoint has a
//! payload recovers after the configured delay, as if the service had
//! answered; otherwise the original error is handed back to the caller.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use napire_backend::{BackendError, BackendResult};
use serde::de::DeserializeOwned;

use crate::domain::Result;
use crate::metrics::METRICS;
use crate::obs::emit_fallback_used;

/// Endpoint path → sample reply body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FallbackData {
    payloads: BTreeMap<String, serde_json::Value>,
}

impl FallbackData {
    /// No fallbacks: every failure is surfaced.
    pub fn none() -> Self {
        Self::default()
    }

    /// Parse a JSON object keyed by endpoint path.
    pub fn from_json(json: &str) -> Result<Self> {
        let payloads: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)?;
        Ok(Self { payloads })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn with(mut self, endpoint: &str, payload: serde_json::Value) -> Self {
        self.payloads.insert(endpoint.to_string(), payload);
        self
    }

    pub fn has(&self, endpoint: &str) -> bool {
        self.payloads.contains_key(endpoint)
    }

    /// Substitute the sample payload for the endpoint `err` came from.
    pub async fn recover<T: DeserializeOwned>(
        &self,
        err: BackendError,
        delay: Duration,
    ) -> BackendResult<T> {
        let Some(endpoint) = err.endpoint().map(str::to_string) else {
            return Err(err);
        };
        let Some(payload) = self.payloads.get(&endpoint) else {
            return Err(err);
        };

        let value = serde_json::from_value::<T>(payload.clone()).map_err(|e| {
            BackendError::Decode {
                endpoint: endpoint.clone(),
                reason: format!("fallback payload: {e}"),
            }
        })?;

        emit_fallback_used(&endpoint, &err);
        METRICS.inc_fallbacks();
        tokio::time::sleep(delay).await;
        Ok(value)
    }
}
