//! In-memory fake for the inference service (testing only)
//!
//! `ScriptedBackend` answers every endpoint from canned replies. Task
//! replies are scripted per job id and can be held back behind a gate to
//! force a particular interleaving of concurrent polls.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::error::BackendError;
use crate::service::{BackendResult, InferenceBackend};
use crate::wire::{
    endpoints, Descriptions, InferenceRequest, ItemLists, ItemsReply, JobId, ModelDefinition,
    OutcomeDistribution, TaskReply, TaskResult,
};

#[derive(Debug, Default)]
struct Script {
    descriptions: Option<BackendResult<Descriptions>>,
    items: Option<BackendResult<ItemsReply>>,
    infer: VecDeque<BackendResult<JobId>>,
    tasks: HashMap<String, VecDeque<BackendResult<TaskReply>>>,
    calls: HashMap<&'static str, usize>,
    submitted: Vec<InferenceRequest>,
}

/// Scripted inference service.
///
/// - Catalog endpoints return whatever was last configured (404 if nothing was).
/// - `/infer` pops queued ids; with an empty queue it mints a fresh UUID.
/// - `/tasks` pops the job's script, repeating the final reply forever;
///   unknown jobs answer 404.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    script: Mutex<Script>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_descriptions(&self, reply: BackendResult<Descriptions>) {
        self.script.lock().unwrap().descriptions = Some(reply);
    }

    pub fn set_items(&self, reply: BackendResult<ItemLists>) {
        self.script.lock().unwrap().items = Some(reply.map(|items| ItemsReply {
            items,
            edges: serde_json::Value::Null,
        }));
    }

    pub fn push_job_id(&self, reply: BackendResult<JobId>) {
        self.script.lock().unwrap().infer.push_back(reply);
    }

    /// Append replies to a job's status script.
    pub fn script_task(&self, id: &str, replies: Vec<BackendResult<TaskReply>>) {
        self.script
            .lock()
            .unwrap()
            .tasks
            .entry(id.to_string())
            .or_default()
            .extend(replies);
    }

    /// Hold the next `/tasks` reply for `id` until the returned gate is notified.
    pub fn hold_task(&self, id: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(id.to_string(), Arc::clone(&gate));
        gate
    }

    /// Number of calls made to `endpoint` so far.
    pub fn calls(&self, endpoint: &str) -> usize {
        self.script
            .lock()
            .unwrap()
            .calls
            .get(endpoint)
            .copied()
            .unwrap_or(0)
    }

    /// Every request body received by `/infer`, oldest first.
    pub fn submitted(&self) -> Vec<InferenceRequest> {
        self.script.lock().unwrap().submitted.clone()
    }

    fn record(&self, endpoint: &'static str) {
        *self
            .script
            .lock()
            .unwrap()
            .calls
            .entry(endpoint)
            .or_default() += 1;
    }
}

/// A `RUNNING` status reply.
pub fn running() -> TaskReply {
    TaskReply {
        state: TaskReply::RUNNING.to_string(),
        result: None,
    }
}

/// A `FAILED` status reply.
pub fn failed() -> TaskReply {
    TaskReply {
        state: TaskReply::FAILED.to_string(),
        result: None,
    }
}

/// A finished status reply carrying `data` and a tiny plot.
pub fn finished(data: &[(&str, f64)]) -> TaskReply {
    TaskReply {
        state: "SUCCESS".to_string(),
        result: Some(TaskResult {
            data: data.iter().map(|(k, p)| (*k, *p)).collect::<OutcomeDistribution>(),
            plot: "data:image/png;base64,iVBORw0KGgo=".to_string(),
        }),
    }
}

#[async_trait]
impl InferenceBackend for ScriptedBackend {
    async fn descriptions(&self, _model: &ModelDefinition) -> BackendResult<Descriptions> {
        self.record(endpoints::DESCRIPTIONS);
        self.script
            .lock()
            .unwrap()
            .descriptions
            .clone()
            .unwrap_or_else(|| Err(BackendError::status(endpoints::DESCRIPTIONS, 404)))
    }

    async fn items(&self, _model: &ModelDefinition) -> BackendResult<ItemsReply> {
        self.record(endpoints::ITEMS);
        self.script
            .lock()
            .unwrap()
            .items
            .clone()
            .unwrap_or_else(|| Err(BackendError::status(endpoints::ITEMS, 404)))
    }

    async fn infer(&self, request: &InferenceRequest) -> BackendResult<JobId> {
        self.record(endpoints::INFER);
        let mut script = self.script.lock().unwrap();
        script.submitted.push(request.clone());
        script
            .infer
            .pop_front()
            .unwrap_or_else(|| Ok(JobId::new(uuid::Uuid::new_v4().to_string())))
    }

    async fn task(&self, id: &JobId) -> BackendResult<TaskReply> {
        self.record(endpoints::TASKS);

        let gate = self.gates.lock().unwrap().remove(id.as_str());
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut script = self.script.lock().unwrap();
        match script.tasks.get_mut(id.as_str()) {
            Some(replies) if replies.len() > 1 => replies
                .pop_front()
                .unwrap_or_else(|| Err(BackendError::status(endpoints::TASKS, 404))),
            Some(replies) => replies
                .front()
                .cloned()
                .unwrap_or_else(|| Err(BackendError::status(endpoints::TASKS, 404))),
            None => Err(BackendError::status(endpoints::TASKS, 404)),
        }
    }
}
