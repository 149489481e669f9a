//! Shared fixtures for orchestrator integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use napire_backend::fakes::ScriptedBackend;
use napire_backend::{Descriptions, ItemLists};
use napire_core::{
    DeploymentMode, FallbackData, MemoryNavigator, MemoryNotifier, ModelRegistry, Navigator,
    Orchestrator, OrchestratorConfig, QueryParams,
};

pub const MODEL: &str = "Cause analyzer";

pub struct Harness {
    pub backend: Arc<ScriptedBackend>,
    pub navigator: Arc<MemoryNavigator>,
    pub notifier: Arc<MemoryNotifier>,
    pub orch: Orchestrator,
}

impl Harness {
    pub fn new(mode: DeploymentMode, fallback: FallbackData) -> Self {
        let backend = Arc::new(ScriptedBackend::new());
        backend.set_descriptions(Ok(descriptions()));
        backend.set_items(Ok(items()));
        Self::with_backend(backend, mode, fallback)
    }

    pub fn with_backend(
        backend: Arc<ScriptedBackend>,
        mode: DeploymentMode,
        fallback: FallbackData,
    ) -> Self {
        let navigator = Arc::new(MemoryNavigator::new(QueryParams::new(Some(MODEL), None)));
        let notifier = Arc::new(MemoryNotifier::new());
        let config = OrchestratorConfig::default()
            .with_mode(mode)
            .with_poll_interval(Duration::from_secs(1))
            .with_fallback_delay(Duration::from_secs(1));

        let orch = Orchestrator::new(
            backend.clone(),
            navigator.clone(),
            notifier.clone(),
            ModelRegistry::bundled().unwrap(),
            fallback,
            config,
        );

        Self {
            backend,
            navigator,
            notifier,
            orch,
        }
    }

    pub fn strict() -> Self {
        Self::new(DeploymentMode::Strict, FallbackData::none())
    }

    /// Feed the navigator's current parameters back into the orchestrator.
    pub async fn follow_navigation(&self) -> napire_core::Result<()> {
        self.orch.on_params_changed(&self.navigator.current()).await
    }
}

pub fn descriptions() -> Descriptions {
    [
        ("CAUSES_CODE_06", "Complexity of project"),
        ("CAUSES_CODE_48", "Lack of time"),
        ("CAUSES_CODE_42", "Missing direct communication"),
        ("PROBLEMS_CODE_01", "Unclear requirements"),
        ("PROBLEMS_CODE_02", "NotCodable"),
        ("PROBLEMS_CODE_03", "communication flaws"),
        ("EFFECTS_CODE_01", "Delays"),
        ("EFFECTS_CODE_02", "Customer dissatisfaction"),
        ("CONTEXT_SIZE_01", "1-10"),
        ("CONTEXT_SIZE_02", "11-50"),
        ("CONTEXT_SIZE_03", "51+"),
        ("CONTEXT_DEV_01", "Agile"),
        ("CONTEXT_DEV_02", "NotCodable"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

pub fn items() -> ItemLists {
    [
        (
            "PROBLEMS_CODE",
            vec!["PROBLEMS_CODE_01", "PROBLEMS_CODE_02", "PROBLEMS_CODE_03"],
        ),
        ("EFFECTS_CODE", vec!["EFFECTS_CODE_01", "EFFECTS_CODE_02"]),
        (
            "CONTEXT_SIZE",
            vec!["CONTEXT_SIZE_03", "CONTEXT_SIZE_01", "CONTEXT_SIZE_02"],
        ),
        ("CONTEXT_DEV", vec!["CONTEXT_DEV_02", "CONTEXT_DEV_01"]),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.into_iter().map(str::to_string).collect()))
    .collect()
}
