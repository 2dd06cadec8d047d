use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered field name → value mapping. Insertion order is kept so that
/// written plans list fields the way they were mapped.
pub type Fields = IndexMap<String, Value>;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A customer record from the authoritative CRM system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRecord(pub Fields);

impl SourceRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }
}

impl FromIterator<(String, Value)> for SourceRecord {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// An organization as it currently exists in the monitoring system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRecord {
    /// Address of the organization in the monitoring system.
    pub uri: String,
    #[serde(default)]
    pub details: Fields,
}

/// Pre-loaded records from both systems.
#[derive(Debug, Clone, Default)]
pub struct ReconInput {
    pub sources: Vec<SourceRecord>,
    pub targets: Vec<TargetRecord>,
}

// ---------------------------------------------------------------------------
// Mapping
// ---------------------------------------------------------------------------

/// A source record projected into the target vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappedRecord(pub Fields);

impl MappedRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tasks + Plan
// ---------------------------------------------------------------------------

/// Fields to change on an existing organization, addressed by its uri.
/// Serializes flat: changed fields in mapping order, then `uri`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateTask {
    #[serde(flatten)]
    pub changes: Fields,
    pub uri: String,
}

/// The three-bucket change plan. Buckets keep encounter order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconPlan {
    pub create: Vec<MappedRecord>,
    pub update: Vec<UpdateTask>,
    pub delete: Vec<String>,
}

impl ReconPlan {
    pub fn is_empty(&self) -> bool {
        self.create.is_empty() && self.update.is_empty() && self.delete.is_empty()
    }

    pub fn task_count(&self) -> usize {
        self.create.len() + self.update.len() + self.delete.len()
    }
}

/// Outcome of matching a single target record against the mapped index.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// No correlation key on the target; out of reconciliation scope.
    Ignored,
    /// Correlation key not present in the source system.
    Delete { crm_id: String, uri: String },
    /// Matched, and at least one mapped field differs.
    Update { crm_id: String, task: UpdateTask },
    /// Matched, and every mapped field agrees.
    InSync { crm_id: String },
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub sources: usize,
    pub targets: usize,
    pub mapped: usize,
    pub create: usize,
    pub update: usize,
    pub delete: usize,
    pub in_sync: usize,
    pub ignored: usize,
}

impl PlanSummary {
    /// True when the plan carries no tasks.
    pub fn is_empty(&self) -> bool {
        self.create + self.update + self.delete == 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: PlanSummary,
    pub plan: ReconPlan,
}
