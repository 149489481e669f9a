//! Inference job lifecycle.

use napire_backend::{JobId, TaskReply, TaskResult};
use serde::Serialize;

/// State of the tracked inference job.
///
/// `Completed` always carries its result payload; a terminal reply without
/// one is classified as `Failed`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobState {
    #[default]
    NoTask,
    Running { id: JobId },
    Completed { id: JobId, result: TaskResult },
    Failed { id: JobId },
}

impl JobState {
    /// Classify a status reply for job `id`.
    pub fn from_reply(id: JobId, reply: TaskReply) -> Self {
        if reply.is_running() {
            return JobState::Running { id };
        }
        match reply.result {
            Some(result) if reply.state != TaskReply::FAILED => JobState::Completed { id, result },
            _ => JobState::Failed { id },
        }
    }

    pub fn id(&self) -> Option<&JobId> {
        match self {
            JobState::NoTask => None,
            JobState::Running { id }
            | JobState::Completed { id, .. }
            | JobState::Failed { id } => Some(id),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed { .. } | JobState::Failed { .. })
    }

    pub fn is_running(&self) -> bool {
        matches!(self, JobState::Running { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobState::NoTask => "no_task",
            JobState::Running { .. } => "running",
            JobState::Completed { .. } => "completed",
            JobState::Failed { .. } => "failed",
        }
    }
}
