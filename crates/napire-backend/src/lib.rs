//! Napire-Backend: wire types and transport for the napire inference service
//!
//! This crate owns every byte that crosses the network: the JSON payloads of
//! the four service endpoints and the async [`InferenceBackend`] trait that
//! the orchestration layer is written against.
//!
//! ## Layer 0 - Transport
//!
//! Focus: faithful payload shapes and errors that name their endpoint.
//!
//! ## Key Components
//!
//! - `HttpBackend`: reqwest client for a live service
//! - `ScriptedBackend`: in-memory fake with per-job reply scripts
//! - `wire`: `ModelDefinition`, `InferenceRequest`, `TaskReply`, `JobId`, ...

mod error;
pub mod fakes;
mod http;
pub mod service;
pub mod wire;

pub use error::BackendError;
pub use http::{BackendConfig, HttpBackend};
pub use service::{BackendResult, InferenceBackend};
pub use wire::{
    endpoints, Descriptions, EdgeSpec, Evidence, InferenceRequest, ItemLists, ItemsReply, JobId,
    ModelDefinition, NodeSpec, OutcomeDistribution, TaskReply, TaskResult,
};
