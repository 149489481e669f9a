//! Job status polling.
//!
//! A job is polled until the service reports something other than
//! `RUNNING`. There is no retry limit: the only other ways out are a poll
//! error and supersession, checked through the caller's `is_current` check
//! before every request. The service has no cancel endpoint, so a
//! superseded poll simply stops issuing requests.

use napire_backend::{BackendResult, InferenceBackend, JobId, TaskReply};
use tracing::instrument;

use crate::config::{DeploymentMode, OrchestratorConfig};
use crate::domain::JobState;
use crate::fallback::FallbackData;
use crate::metrics::METRICS;
use crate::obs::{emit_job_not_found, emit_job_polled};

/// How a poll sequence ended.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Terminal state reported (`Completed` or `Failed`).
    Finished(JobState),
    /// Lenient mode: the service no longer knows the job.
    Forgotten,
    /// A newer job or model selection took over.
    Superseded,
}

/// Poll `id` until a terminal state, supersession or an unrecoverable error.
///
/// Errors are first offered to `fallback`; in [`DeploymentMode::Lenient`] a
/// 404 ends the sequence as [`PollOutcome::Forgotten`] instead.
#[instrument(skip_all, fields(job_id = %id))]
pub async fn poll_job<F>(
    backend: &dyn InferenceBackend,
    id: &JobId,
    config: &OrchestratorConfig,
    fallback: &FallbackData,
    is_current: F,
) -> BackendResult<PollOutcome>
where
    F: Fn() -> bool,
{
    loop {
        if !is_current() {
            return Ok(PollOutcome::Superseded);
        }

        METRICS.inc_polls();
        let reply: TaskReply = match backend.task(id).await {
            Ok(reply) => reply,
            Err(e) if e.is_not_found() && config.mode == DeploymentMode::Lenient => {
                emit_job_not_found(id.as_str());
                return Ok(PollOutcome::Forgotten);
            }
            Err(e) => fallback.recover(e, config.fallback_delay).await?,
        };
        emit_job_polled(id.as_str(), &reply.state);

        if !reply.is_running() {
            return Ok(PollOutcome::Finished(JobState::from_reply(id.clone(), reply)));
        }

        tokio::time::sleep(config.poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use napire_backend::fakes::{self, ScriptedBackend};
    use napire_backend::{endpoints, BackendError};
    use serde_json::json;
    use std::cell::Cell;
    use std::time::Duration;

    fn config(mode: DeploymentMode) -> OrchestratorConfig {
        OrchestratorConfig::default().with_mode(mode)
    }

    #[tokio::test(start_paused = true)]
    async fn test_running_replies_keep_polling() {
        let backend = ScriptedBackend::new();
        backend.script_task(
            "1",
            vec![
                Ok(fakes::running()),
                Ok(fakes::running()),
                Ok(fakes::running()),
                Ok(fakes::finished(&[("A", 0.4)])),
            ],
        );
        let started = tokio::time::Instant::now();

        let outcome = poll_job(
            &backend,
            &JobId::from("1"),
            &config(DeploymentMode::Strict),
            &FallbackData::none(),
            || true,
        )
        .await
        .unwrap();

        assert!(matches!(outcome, PollOutcome::Finished(JobState::Completed { .. })));
        assert_eq!(backend.calls(endpoints::TASKS), 4);
        assert!(started.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_supersession_stops_polling() {
        let backend = ScriptedBackend::new();
        backend.script_task("1", vec![Ok(fakes::running())]);
        let budget = Cell::new(3);

        let outcome = poll_job(
            &backend,
            &JobId::from("1"),
            &config(DeploymentMode::Strict),
            &FallbackData::none(),
            || {
                budget.set(budget.get() - 1);
                budget.get() >= 0
            },
        )
        .await
        .unwrap();

        assert_eq!(outcome, PollOutcome::Superseded);
        assert_eq!(backend.calls(endpoints::TASKS), 3);
    }

    #[tokio::test]
    async fn test_not_found_is_forgotten_in_lenient_mode() {
        let backend = ScriptedBackend::new();
        let outcome = poll_job(
            &backend,
            &JobId::from("expired"),
            &config(DeploymentMode::Lenient),
            &FallbackData::none(),
            || true,
        )
        .await
        .unwrap();

        assert_eq!(outcome, PollOutcome::Forgotten);
    }

    #[tokio::test]
    async fn test_not_found_is_an_error_in_strict_mode() {
        let backend = ScriptedBackend::new();
        let err = poll_job(
            &backend,
            &JobId::from("expired"),
            &config(DeploymentMode::Strict),
            &FallbackData::none(),
            || true,
        )
        .await
        .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_recovered_from_fallback() {
        let backend = ScriptedBackend::new();
        backend.script_task(
            "2",
            vec![Err(BackendError::transport(endpoints::TASKS, "reset by peer"))],
        );
        let fallback = FallbackData::none().with(
            endpoints::TASKS,
            json!({ "state": "SUCCESS", "result": { "data": { "CAUSES_CODE_02": 0.5 }, "plot": "" } }),
        );

        let outcome = poll_job(
            &backend,
            &JobId::from("2"),
            &config(DeploymentMode::Strict),
            &fallback,
            || true,
        )
        .await
        .unwrap();

        match outcome {
            PollOutcome::Finished(JobState::Completed { id, result }) => {
                assert_eq!(id.as_str(), "2");
                assert_eq!(result.data.len(), 1);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
