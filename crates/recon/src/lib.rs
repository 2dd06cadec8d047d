//! `orgsync-recon`: CRM-to-monitoring organization reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded records, returns a create/update/
//! delete plan. No CLI or IO dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod mapping;
pub mod matcher;
pub mod model;
pub mod observer;
pub mod plan;

pub use config::{DuplicatePolicy, FieldRule, SyncConfig};
pub use engine::{run, run_with_observer};
pub use error::ReconError;
pub use mapping::{map_all, FieldMapping, MappedIndex};
pub use matcher::{classify, diff};
pub use model::{
    Classification, MappedRecord, PlanSummary, ReconInput, ReconPlan, ReconResult, SourceRecord,
    TargetRecord, UpdateTask,
};
pub use observer::{timed, LogObserver, NoopObserver, ReconObserver};
pub use plan::{finalize, TaskAccumulator};
