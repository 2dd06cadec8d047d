use crate::mapping::MappedIndex;
use crate::model::{Classification, PlanSummary, ReconPlan};

/// Append every unconsumed mapped record to the create bucket, in the order
/// its identifier was first seen.
pub fn finalize(mut plan: ReconPlan, index: MappedIndex) -> ReconPlan {
    plan.create.extend(index.into_remaining());
    plan
}

/// Collects classification outcomes into the three plan buckets.
#[derive(Debug, Default)]
pub struct TaskAccumulator {
    plan: ReconPlan,
    in_sync: usize,
    ignored: usize,
}

impl TaskAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: Classification) {
        match outcome {
            Classification::Ignored => self.ignored += 1,
            Classification::InSync { .. } => self.in_sync += 1,
            Classification::Delete { uri, .. } => self.plan.delete.push(uri),
            Classification::Update { task, .. } => self.plan.update.push(task),
        }
    }

    /// Move the leftovers of `index` into the create bucket.
    /// Returns how many creates were added.
    pub fn finalize(&mut self, index: MappedIndex) -> usize {
        let before = self.plan.create.len();
        self.plan = finalize(std::mem::take(&mut self.plan), index);
        self.plan.create.len() - before
    }

    pub fn plan(&self) -> &ReconPlan {
        &self.plan
    }

    pub fn summary(&self, sources: usize, targets: usize, mapped: usize) -> PlanSummary {
        PlanSummary {
            sources,
            targets,
            mapped,
            create: self.plan.create.len(),
            update: self.plan.update.len(),
            delete: self.plan.delete.len(),
            in_sync: self.in_sync,
            ignored: self.ignored,
        }
    }

    pub fn into_plan(self) -> ReconPlan {
        self.plan
    }
}
