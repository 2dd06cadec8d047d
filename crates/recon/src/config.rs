use serde::Deserialize;

use crate::error::ReconError;
use crate::mapping::FieldMapping;

/// Correlation key on the monitoring side, nested under `details`.
pub const DEFAULT_CORRELATION_KEY: &str = "crm_id";

/// Reserved key carrying the target address in update tasks.
pub const URI_KEY: &str = "uri";

/// ServiceNow customer field → monitoring organization field.
pub const DEFAULT_FIELDS: &[(&str, &str)] = &[
    ("sys_id", "crm_id"),
    ("name", "company"),
    ("street", "address"),
    ("city", "city"),
    ("state", "state"),
    ("zip", "zip"),
    ("country", "country"),
    ("latitude", "latitude"),
    ("longitude", "longitude"),
];

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_correlation_key")]
    pub correlation_key: String,
    #[serde(default)]
    pub duplicate_ids: DuplicatePolicy,
    /// Ordered field rules. Order drives the key order of mapped records.
    #[serde(default = "default_fields")]
    pub fields: Vec<FieldRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldRule {
    pub source: String,
    pub target: String,
}

impl FieldRule {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self { source: source.into(), target: target.into() }
    }
}

/// What to do when two source records carry the same identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail the run with `DuplicateIdentifier`.
    #[default]
    Reject,
    /// Later records overwrite earlier ones; the first position is kept.
    LastWins,
}

impl std::fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::LastWins => write!(f, "last_wins"),
        }
    }
}

fn default_name() -> String {
    "servicenow-monitoring".into()
}

fn default_correlation_key() -> String {
    DEFAULT_CORRELATION_KEY.into()
}

fn default_fields() -> Vec<FieldRule> {
    DEFAULT_FIELDS.iter().map(|(s, t)| FieldRule::new(*s, *t)).collect()
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            correlation_key: default_correlation_key(),
            duplicate_ids: DuplicatePolicy::default(),
            fields: default_fields(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl SyncConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: SyncConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.name.trim().is_empty() {
            return Err(ReconError::ConfigValidation("name must not be empty".into()));
        }
        self.field_mapping().map(|_| ())
    }

    /// Build the validated field mapping for this config.
    pub fn field_mapping(&self) -> Result<FieldMapping, ReconError> {
        FieldMapping::new(self.fields.clone(), &self.correlation_key)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
