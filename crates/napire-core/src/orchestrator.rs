//! Pipeline wiring: model selection → catalog → submission → poll → ranking.
//!
//! The orchestrator reacts to the two navigation parameters and to evidence
//! edits, and owns every piece of UI-bound state. Each parameter has its own
//! generation counter; a pipeline run captures the generation when it starts
//! and only writes state if it is still current when its I/O resolves. Runs
//! that were superseded in the meantime are dropped, so the most recently
//! started run always wins regardless of reply order.
//!
//! State lives behind a `std::sync::Mutex` that is never held across an
//! `.await`; concurrent calls interleave cooperatively at I/O points.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use napire_backend::{Descriptions, InferenceBackend, ItemLists, JobId};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::OrchestratorConfig;
use crate::domain::{
    project, AbsentValue, Catalog, EvidenceSet, JobState, ModelEntry, ModelRegistry,
    NapireError, Ranking, Result,
};
use crate::fallback::FallbackData;
use crate::loader::load_catalog;
use crate::metrics::METRICS;
use crate::navigation::{Navigator, Notifier, QueryParams};
use crate::obs::{
    emit_catalog_loaded, emit_job_finished, emit_job_submitted, emit_stale_discarded,
};
use crate::poller::{poll_job, PollOutcome};
use crate::request::build_request;

/// Exclusive category driven by the project size slider.
pub const SLIDER_CATEGORY: &str = "CONTEXT_SIZE";

/// Snapshot of everything the presentation layer binds to.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    pub model_id: Option<String>,
    pub descriptions: Descriptions,
    pub items: ItemLists,
    pub loaded: bool,
    pub running: bool,
    pub job: Option<JobState>,
    pub ranking: Ranking,
    pub plot: Option<String>,
}

#[derive(Debug, Default)]
struct Shared {
    model_generation: u64,
    /// Model whose catalog is loaded; `None` while loading or after a failure.
    model_id: Option<String>,
    model: Option<ModelEntry>,
    catalog: Option<Catalog>,
    evidence: EvidenceSet,

    job_generation: u64,
    job: JobState,
    job_started_at: Option<chrono::DateTime<Utc>>,
    /// Submissions awaiting their job id.
    submitting: usize,
    /// A submitted id was handed to the navigator and not yet picked up.
    handoff: bool,
    polling: bool,
    ranking: Ranking,
    plot: Option<String>,
}

impl Shared {
    fn tracked_job(&self) -> Option<&JobId> {
        self.job.id()
    }

    fn running(&self) -> bool {
        self.submitting > 0 || self.handoff || self.polling
    }

    fn clear_result(&mut self) {
        self.ranking = Ranking::default();
        self.plot = None;
    }

    /// Project the current job state into ranking and plot.
    fn present(&mut self, short_len: usize) {
        let presented = match &self.job {
            JobState::Completed { result, .. } => {
                let descriptions = self.catalog.as_ref().map(|c| &c.descriptions);
                let ranking = project(
                    &result.data,
                    descriptions.unwrap_or(&Descriptions::new()),
                    short_len,
                );
                Some((ranking, result.plot.clone()))
            }
            JobState::Running { .. } => return,
            JobState::Failed { .. } | JobState::NoTask => None,
        };

        match presented {
            Some((ranking, plot)) => {
                self.ranking = ranking;
                self.plot = Some(plot);
            }
            None => self.clear_result(),
        }
    }
}

/// Stateful driver of the inference pipeline.
pub struct Orchestrator {
    backend: Arc<dyn InferenceBackend>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    registry: ModelRegistry,
    fallback: FallbackData,
    config: OrchestratorConfig,
    state: Mutex<Shared>,
}

impl Orchestrator {
    pub fn new(
        backend: Arc<dyn InferenceBackend>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
        registry: ModelRegistry,
        fallback: FallbackData,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            backend,
            navigator,
            notifier,
            registry,
            fallback,
            config,
            state: Mutex::new(Shared::default()),
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// React to a change of the navigation parameters.
    ///
    /// The job stage only runs once the catalog stage succeeded.
    pub async fn on_params_changed(&self, params: &QueryParams) -> Result<()> {
        self.select_model(params.model.as_deref()).await?;
        self.on_job_id_changed(params.job_id.as_deref()).await
    }

    /// Load the catalog of `model_param` (or the default model).
    ///
    /// Re-selecting the loaded model is a no-op. Selecting a different model
    /// supersedes any catalog load and any job poll still in flight.
    pub async fn select_model(&self, model_param: Option<&str>) -> Result<()> {
        let model_id = model_param
            .filter(|m| !m.is_empty())
            .unwrap_or(self.config.default_model.as_str())
            .to_string();
        let entry = self
            .registry
            .get(&model_id)
            .cloned()
            .ok_or_else(|| NapireError::UnknownModel(model_id.clone()))?;

        let generation = {
            let mut state = self.lock();
            if state.model_id.as_deref() == Some(model_id.as_str()) && state.catalog.is_some() {
                debug!(model_id = %model_id, "model already loaded");
                return Ok(());
            }

            state.model_generation += 1;
            state.model_id = None;
            state.model = None;
            state.catalog = None;
            if state.job.is_running() {
                // Forget the in-flight job so the next id change re-polls it
                // under the new catalog.
                state.job_generation += 1;
                state.job = JobState::NoTask;
                state.polling = false;
            }
            state.model_generation
        };

        let loaded = load_catalog(
            self.backend.as_ref(),
            &entry,
            &self.fallback,
            self.config.fallback_delay,
        )
        .await;

        let mut state = self.lock();
        if state.model_generation != generation {
            METRICS.inc_stale_discarded();
            emit_stale_discarded("catalog", generation, state.model_generation);
            return Ok(());
        }

        match loaded {
            Ok(catalog) => {
                emit_catalog_loaded(&model_id, catalog.items.len(), catalog.descriptions.len());
                state.catalog = Some(catalog);
                state.model = Some(entry);
                state.model_id = Some(model_id);
                if state.job.is_terminal() {
                    let short_len = self.config.short_len;
                    state.present(short_len);
                }
                Ok(())
            }
            Err(e) => {
                drop(state);
                self.surface(&e);
                Err(e)
            }
        }
    }

    /// React to a change of the job-identifier parameter.
    ///
    /// - empty: no task; a lingering `id` parameter is cleared;
    /// - the tracked id: the last terminal result is replayed, or the
    ///   running poll is left to finish;
    /// - anything else: a new poll supersedes the previous one.
    pub async fn on_job_id_changed(&self, job_param: Option<&str>) -> Result<()> {
        self.lock().handoff = false;
        let Some(id) = job_param.filter(|j| !j.is_empty()).map(JobId::from) else {
            {
                let mut state = self.lock();
                state.job_generation += 1;
                state.job = JobState::NoTask;
                state.polling = false;
                state.clear_result();
            }
            self.clear_job_param();
            return Ok(());
        };

        let generation = {
            let mut state = self.lock();
            if state.tracked_job() == Some(&id) {
                if state.job.is_terminal() {
                    debug!(job_id = %id, "replaying terminal result");
                    state.polling = false;
                    let short_len = self.config.short_len;
                    state.present(short_len);
                }
                return Ok(());
            }

            state.job_generation += 1;
            state.job = JobState::Running { id: id.clone() };
            state.job_started_at = Some(Utc::now());
            state.polling = true;
            state.job_generation
        };

        let outcome = poll_job(
            self.backend.as_ref(),
            &id,
            &self.config,
            &self.fallback,
            || self.lock().job_generation == generation,
        )
        .await;

        let mut state = self.lock();
        if state.job_generation != generation {
            METRICS.inc_stale_discarded();
            emit_stale_discarded("job", generation, state.job_generation);
            return Ok(());
        }
        state.polling = false;
        let duration_ms = state
            .job_started_at
            .map(|started| (Utc::now() - started).num_milliseconds())
            .unwrap_or_default();

        match outcome {
            Ok(PollOutcome::Finished(job)) => {
                emit_job_finished(id.as_str(), job.label(), duration_ms);
                state.job = job;
                let short_len = self.config.short_len;
                state.present(short_len);
                Ok(())
            }
            Ok(PollOutcome::Superseded) => Ok(()),
            Ok(PollOutcome::Forgotten) => {
                state.job = JobState::NoTask;
                state.clear_result();
                drop(state);
                self.clear_job_param();
                Ok(())
            }
            Err(e) => {
                emit_job_finished(id.as_str(), "failed", duration_ms);
                state.job = JobState::Failed { id };
                state.clear_result();
                drop(state);
                let err = NapireError::JobTransport(e);
                self.surface(&err);
                Err(err)
            }
        }
    }

    /// Submit the current model and evidence as a new inference job.
    ///
    /// On success the navigation layer is pointed at the returned id, unless
    /// it already is, in which case the submission resolves immediately.
    pub async fn run(&self) -> Result<JobId> {
        let request = {
            let mut state = self.lock();
            let model = state.model.as_ref().ok_or(NapireError::NoModelLoaded)?;
            let request = build_request(&model.definition, &state.evidence, &self.config.inference);
            state.submitting += 1;
            request
        };

        let submitted = match self.backend.infer(&request).await {
            Ok(id) => Ok(id),
            Err(e) => self.fallback.recover(e, self.config.fallback_delay).await,
        };
        let id = match submitted {
            Ok(id) => id,
            Err(e) => {
                self.lock().submitting -= 1;
                let err = NapireError::JobTransport(e);
                self.surface(&err);
                return Err(err);
            }
        };
        METRICS.inc_jobs_submitted();
        emit_job_submitted(id.as_str(), request.evidence.len());

        let current = self.navigator.current();
        if current.job_id.as_deref() == Some(id.as_str()) {
            info!(job_id = %id, "submission resolved to the active job");
            self.lock().submitting -= 1;
            return Ok(id);
        }

        {
            let mut state = self.lock();
            state.submitting -= 1;
            state.handoff = true;
        }
        self.navigator.navigate(QueryParams {
            model: current.model,
            job_id: Some(id.to_string()),
        });
        Ok(id)
    }

    /// Assert or forget a single item.
    pub fn set_evidence(&self, item: &str, value: bool) {
        self.lock().evidence.set(item, value);
    }

    /// Assert `chosen` as the only true item of `category`.
    pub fn set_exclusive_evidence(&self, category: &str, chosen: &str, absent: AbsentValue) {
        let mut state = self.lock();
        let siblings = state
            .catalog
            .as_ref()
            .map(|c| c.items_in(category).to_vec())
            .unwrap_or_default();
        state.evidence.set_exclusive(&siblings, chosen, absent);
    }

    /// Move the project size slider; a negative position means unknown.
    pub fn set_slider_evidence(&self, position: i32) {
        if position < 0 {
            self.set_exclusive_evidence(SLIDER_CATEGORY, "", AbsentValue::Unset);
        } else {
            let item = slider_item(position);
            self.set_exclusive_evidence(SLIDER_CATEGORY, &item, AbsentValue::False);
        }
    }

    /// Label shown next to the slider at `position`.
    pub fn slider_label(&self, position: i32) -> String {
        if position < 0 {
            return "?".to_string();
        }
        let item = slider_item(position);
        self.lock()
            .catalog
            .as_ref()
            .and_then(|c| c.describe(&item))
            .unwrap_or(&item)
            .to_string()
    }

    pub fn evidence(&self) -> EvidenceSet {
        self.lock().evidence.clone()
    }

    pub fn view(&self) -> ViewState {
        let state = self.lock();
        let (descriptions, items) = state
            .catalog
            .as_ref()
            .map(|c| (c.descriptions.clone(), c.items.clone()))
            .unwrap_or_default();

        ViewState {
            model_id: state.model_id.clone(),
            descriptions,
            items,
            loaded: state.catalog.is_some(),
            running: state.running(),
            job: match &state.job {
                JobState::NoTask => None,
                job => Some(job.clone()),
            },
            ranking: state.ranking.clone(),
            plot: state.plot.clone(),
        }
    }

    fn clear_job_param(&self) {
        let current = self.navigator.current();
        if current.job_id.is_some() {
            self.navigator.navigate(QueryParams {
                model: current.model,
                job_id: None,
            });
        }
    }

    fn surface(&self, err: &NapireError) {
        match err.backend() {
            Some(backend) => self.notifier.notify(&backend.to_string()),
            None => self.notifier.notify(&err.to_string()),
        }
    }
}

fn slider_item(position: i32) -> String {
    format!("{SLIDER_CATEGORY}_{position:02}")
}
