//! Service trait for the napire inference backend
//!
//! One async method per endpoint. The trait is backend-agnostic: the
//! reqwest-based [`crate::HttpBackend`] talks to a live service, and
//! [`crate::fakes::ScriptedBackend`] replays canned replies in tests.

use async_trait::async_trait;

use crate::error::BackendError;
use crate::wire::{Descriptions, InferenceRequest, ItemsReply, JobId, ModelDefinition, TaskReply};

/// Result type for backend operations
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Inference service endpoints consumed by the orchestrator.
///
/// Guarantees expected from implementations:
/// - every error carries the endpoint path it came from;
/// - a missing job is reported as a 404 [`BackendError::Status`];
/// - no method retries on its own.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// `POST /descriptions`: labels for every item of the model.
    async fn descriptions(&self, model: &ModelDefinition) -> BackendResult<Descriptions>;

    /// `POST /items`: selectable items per category.
    async fn items(&self, model: &ModelDefinition) -> BackendResult<ItemsReply>;

    /// `POST /infer`: submit an inference job, returning its id.
    async fn infer(&self, request: &InferenceRequest) -> BackendResult<JobId>;

    /// `GET /tasks?printresult=true&id=<id>`: current status of a job.
    async fn task(&self, id: &JobId) -> BackendResult<TaskReply>;
}
