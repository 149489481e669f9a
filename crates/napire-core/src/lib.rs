//! Napire Core Library
//!
//! Asynchronous job orchestration for napire inference: loads the catalog
//! of a selected model, tracks user evidence, submits inference jobs,
//! follows them to completion and ranks the outcome distribution.

pub mod config;
pub mod domain;
pub mod fallback;
pub mod loader;
pub mod metrics;
pub mod navigation;
pub mod obs;
pub mod orchestrator;
pub mod poller;
pub mod request;
pub mod telemetry;

pub use config::{DeploymentMode, InferenceSettings, OrchestratorConfig};
pub use domain::{
    locale_cmp, project, AbsentValue, Catalog, EvidenceSet, GenericCategoryMap, JobState,
    ModelEntry, ModelRegistry, NapireError, RankedEntry, Ranking, Result, NOT_CODABLE,
};
pub use fallback::FallbackData;
pub use loader::load_catalog;
pub use metrics::METRICS;
pub use navigation::{
    MemoryNavigator, MemoryNotifier, Navigator, Notifier, QueryParams, TracingNotifier,
};
pub use orchestrator::{Orchestrator, ViewState, SLIDER_CATEGORY};
pub use poller::{poll_job, PollOutcome};
pub use request::build_request;
pub use telemetry::init_tracing;

pub use napire_backend::{
    BackendConfig, BackendError, HttpBackend, InferenceBackend, JobId, ModelDefinition,
};

/// Napire version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
