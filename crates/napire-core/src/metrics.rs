//! Global atomic counters for orchestration activity.
//!
//! Counters are incremented silently at the call site. Call
//! [`Metrics::flush`] to emit current values as a single
//! `tracing::info!` event (e.g. when the CLI exits).

use std::sync::atomic::{AtomicU64, Ordering};

/// Global metrics singleton.
pub static METRICS: Metrics = Metrics::new();

pub struct Metrics {
    catalog_loads: AtomicU64,
    fallbacks_used: AtomicU64,
    jobs_submitted: AtomicU64,
    polls_issued: AtomicU64,
    stale_discarded: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            catalog_loads: AtomicU64::new(0),
            fallbacks_used: AtomicU64::new(0),
            jobs_submitted: AtomicU64::new(0),
            polls_issued: AtomicU64::new(0),
            stale_discarded: AtomicU64::new(0),
        }
    }

    pub fn inc_catalog_loads(&self) {
        self.catalog_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_fallbacks(&self) {
        self.fallbacks_used.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_jobs_submitted(&self) {
        self.jobs_submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_polls(&self) {
        self.polls_issued.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "polls_issued", "counter incremented");
    }

    pub fn inc_stale_discarded(&self) {
        self.stale_discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn catalog_loads(&self) -> u64 {
        self.catalog_loads.load(Ordering::Relaxed)
    }

    pub fn fallbacks_used(&self) -> u64 {
        self.fallbacks_used.load(Ordering::Relaxed)
    }

    pub fn jobs_submitted(&self) -> u64 {
        self.jobs_submitted.load(Ordering::Relaxed)
    }

    pub fn polls_issued(&self) -> u64 {
        self.polls_issued.load(Ordering::Relaxed)
    }

    pub fn stale_discarded(&self) -> u64 {
        self.stale_discarded.load(Ordering::Relaxed)
    }

    /// Emit all current counter values as a single `info!` event.
    pub fn flush(&self) {
        tracing::info!(
            metric = "flush",
            catalog_loads = self.catalog_loads(),
            fallbacks_used = self.fallbacks_used(),
            jobs_submitted = self.jobs_submitted(),
            polls_issued = self.polls_issued(),
            stale_discarded = self.stale_discarded(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_counters_increment() {
        let metrics = Metrics::new();
        metrics.inc_polls();
        metrics.inc_polls();
        metrics.inc_stale_discarded();

        assert_eq!(metrics.polls_issued(), 2);
        assert_eq!(metrics.stale_discarded(), 1);
        assert_eq!(metrics.jobs_submitted(), 0);
        metrics.flush();
    }
}
