//! Seams to the presentation layer: query parameters and notifications.
//!
//! The navigation layer owns the `model` and `id` parameters. The
//! orchestrator reads them and writes them back in two cases: after a
//! submission (to point `id` at the new job) and when normalising a
//! missing job away.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::error;

/// Externally owned query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    pub model: Option<String>,
    #[serde(rename = "id")]
    pub job_id: Option<String>,
}

impl QueryParams {
    pub fn new(model: Option<&str>, job_id: Option<&str>) -> Self {
        Self {
            model: model.map(str::to_string),
            job_id: job_id.map(str::to_string),
        }
    }
}

/// Navigation layer owning the query parameters.
pub trait Navigator: Send + Sync {
    fn current(&self) -> QueryParams;

    /// Replace the parameters. Implementations typically feed the new value
    /// back into [`crate::Orchestrator::on_params_changed`].
    fn navigate(&self, params: QueryParams);
}

/// Navigator holding the parameters in memory and recording every change.
#[derive(Debug, Default)]
pub struct MemoryNavigator {
    current: Mutex<QueryParams>,
    history: Mutex<Vec<QueryParams>>,
}

impl MemoryNavigator {
    pub fn new(initial: QueryParams) -> Self {
        Self {
            current: Mutex::new(initial),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Every `navigate` call so far, oldest first.
    pub fn history(&self) -> Vec<QueryParams> {
        self.history.lock().unwrap().clone()
    }
}

impl Navigator for MemoryNavigator {
    fn current(&self) -> QueryParams {
        self.current.lock().unwrap().clone()
    }

    fn navigate(&self, params: QueryParams) {
        self.history.lock().unwrap().push(params.clone());
        *self.current.lock().unwrap() = params;
    }
}

/// Interrupting user notification for unrecoverable failures.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Notifier that reports through `tracing` at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str) {
        error!(event = "user.notified", "{message}");
    }
}

/// Notifier recording messages for inspection.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    messages: Mutex<Vec<String>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
