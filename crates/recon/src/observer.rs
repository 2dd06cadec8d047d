//! Run instrumentation.
//!
//! The engine reports progress to a `ReconObserver` passed in by the caller.
//! `NoopObserver` is the default; `LogObserver` forwards to the `log` facade.

use std::time::{Duration, Instant};

use crate::model::{Classification, PlanSummary, TargetRecord};

pub trait ReconObserver {
    /// Source records were mapped and indexed.
    fn mapped(&self, _count: usize) {}

    /// A target record was classified.
    fn classified(&self, _target: &TargetRecord, _outcome: &Classification) {}

    /// Unmatched source records were moved to the create bucket.
    fn creates_gathered(&self, _count: usize) {}

    /// The plan is complete.
    fn completed(&self, _summary: &PlanSummary) {}

    /// A timed step finished.
    fn elapsed(&self, _label: &str, _elapsed: Duration) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ReconObserver for NoopObserver {}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl ReconObserver for LogObserver {
    fn mapped(&self, count: usize) {
        log::info!("mapped {count} source record(s) to organization fields");
    }

    fn classified(&self, target: &TargetRecord, outcome: &Classification) {
        match outcome {
            Classification::Ignored => {
                log::debug!("organization {} has no correlation key, ignored", target.uri);
            }
            Classification::Delete { crm_id, uri } => {
                log::warn!(
                    "organization [crm_id: {crm_id}] not found in source records, \
                     candidate for deletion ({uri})"
                );
            }
            Classification::Update { crm_id, task } => {
                let fields: Vec<&str> = task.changes.keys().map(String::as_str).collect();
                log::info!(
                    "organization [crm_id: {crm_id}] to be updated: {}",
                    fields.join(", ")
                );
            }
            Classification::InSync { crm_id } => {
                log::debug!("organization [crm_id: {crm_id}] in sync");
            }
        }
    }

    fn creates_gathered(&self, count: usize) {
        log::info!("gathered {count} source record(s) for organization creation");
    }

    fn completed(&self, summary: &PlanSummary) {
        log::info!(
            "prepared tasks: create={}, update={}, delete={}",
            summary.create,
            summary.update,
            summary.delete
        );
    }

    fn elapsed(&self, label: &str, elapsed: Duration) {
        log::info!("{label} took {:.6}s", elapsed.as_secs_f64());
    }
}

/// Run `f`, then report its wall-clock time to `observer` under `label`.
pub fn timed<T>(observer: &dyn ReconObserver, label: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let result = f();
    observer.elapsed(label, start.elapsed());
    result
}
