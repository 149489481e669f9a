//! Structured observability hooks for catalog and job lifecycle events.
//!
//! Events are emitted at `info!` level, failures at `warn!`. Filter with
//! `RUST_LOG=napire_core=debug`; see [`crate::telemetry::init_tracing`].

use tracing::{info, warn};

/// Emit event: catalog loaded for a model.
pub fn emit_catalog_loaded(model_id: &str, categories: usize, descriptions: usize) {
    info!(
        event = "catalog.loaded",
        model_id = %model_id,
        categories = categories,
        descriptions = descriptions,
    );
}

/// Emit event: a sample payload stood in for a failed request to `endpoint`.
pub fn emit_fallback_used(endpoint: &str, error: &dyn std::fmt::Display) {
    warn!(event = "fallback.used", endpoint = %endpoint, error = %error);
}

/// Emit event: inference job submitted.
pub fn emit_job_submitted(job_id: &str, evidence_items: usize) {
    info!(event = "job.submitted", job_id = %job_id, evidence_items = evidence_items);
}

/// Emit event: one status poll answered.
pub fn emit_job_polled(job_id: &str, state: &str) {
    tracing::debug!(event = "job.polled", job_id = %job_id, state = %state);
}

/// Emit event: job reached a terminal state.
pub fn emit_job_finished(job_id: &str, state: &str, duration_ms: i64) {
    info!(
        event = "job.finished",
        job_id = %job_id,
        state = %state,
        duration_ms = duration_ms,
    );
}

/// Emit event: the service no longer knows the job; it is forgotten.
pub fn emit_job_not_found(job_id: &str) {
    warn!(event = "job.not_found", job_id = %job_id);
}

/// Emit event: a superseded pipeline run resolved and its result was dropped.
pub fn emit_stale_discarded(stage: &str, generation: u64, current: u64) {
    info!(
        event = "job.stale_discarded",
        stage = %stage,
        generation = generation,
        current = current,
    );
}
