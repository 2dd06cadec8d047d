use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::Value;

use crate::config::{DuplicatePolicy, FieldRule, DEFAULT_CORRELATION_KEY, DEFAULT_FIELDS, URI_KEY};
use crate::error::ReconError;
use crate::model::{Fields, MappedRecord, SourceRecord};

// ---------------------------------------------------------------------------
// Field mapping
// ---------------------------------------------------------------------------

/// Validated, ordered source → target field table.
///
/// Exactly one rule maps onto the correlation key; its source field is the
/// identifier that keys the mapped index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    rules: Vec<FieldRule>,
    correlation_key: String,
    identifier: String,
}

impl FieldMapping {
    pub fn new(rules: Vec<FieldRule>, correlation_key: &str) -> Result<Self, ReconError> {
        if rules.is_empty() {
            return Err(ReconError::ConfigValidation(
                "at least one field rule is required".into(),
            ));
        }

        let mut sources = HashSet::new();
        let mut targets = HashSet::new();
        for rule in &rules {
            if rule.source.is_empty() || rule.target.is_empty() {
                return Err(ReconError::ConfigValidation(
                    "field rule names must not be empty".into(),
                ));
            }
            if rule.target == URI_KEY {
                return Err(ReconError::ConfigValidation(format!(
                    "target field '{URI_KEY}' is reserved for update addressing"
                )));
            }
            if !sources.insert(rule.source.as_str()) {
                return Err(ReconError::ConfigValidation(format!(
                    "source field '{}' is mapped more than once",
                    rule.source
                )));
            }
            if !targets.insert(rule.target.as_str()) {
                return Err(ReconError::ConfigValidation(format!(
                    "target field '{}' is mapped more than once",
                    rule.target
                )));
            }
        }

        let identifier = rules
            .iter()
            .find(|r| r.target == correlation_key)
            .map(|r| r.source.clone())
            .ok_or_else(|| {
                ReconError::ConfigValidation(format!(
                    "no field maps to correlation key '{correlation_key}'"
                ))
            })?;

        Ok(Self {
            rules,
            correlation_key: correlation_key.to_string(),
            identifier,
        })
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Source field holding the record identifier (`sys_id` by default).
    pub fn identifier_field(&self) -> &str {
        &self.identifier
    }

    /// Target field the identifier lands in (`crm_id` by default).
    pub fn correlation_key(&self) -> &str {
        &self.correlation_key
    }

    /// Project one source record into the target vocabulary.
    /// `index` is the record's position in its input, used for error reports.
    pub fn map_record(
        &self,
        index: usize,
        record: &SourceRecord,
    ) -> Result<MappedRecord, ReconError> {
        let mut fields = Fields::with_capacity(self.rules.len());
        for rule in &self.rules {
            let value = record.get(&rule.source).ok_or_else(|| ReconError::MissingField {
                index,
                record_id: record.get(&self.identifier).and_then(scalar_key),
                field: rule.source.clone(),
            })?;
            fields.insert(rule.target.clone(), value.clone());
        }
        Ok(MappedRecord(fields))
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        let rules: Vec<FieldRule> =
            DEFAULT_FIELDS.iter().map(|(s, t)| FieldRule::new(*s, *t)).collect();
        let identifier = DEFAULT_FIELDS
            .iter()
            .find(|(_, t)| *t == DEFAULT_CORRELATION_KEY)
            .map(|(s, _)| s.to_string())
            .unwrap_or_default();
        Self {
            rules,
            correlation_key: DEFAULT_CORRELATION_KEY.into(),
            identifier,
        }
    }
}

/// Lookup key for an identifier or correlation value.
///
/// Strings are taken as-is; numbers and booleans use their JSON text.
/// Null, arrays and objects have no key.
pub fn scalar_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

// ---------------------------------------------------------------------------
// Mapped index
// ---------------------------------------------------------------------------

/// Identifier → mapped record, consumed as targets are matched.
///
/// Consumed slots are emptied in place so the remaining entries keep their
/// first-insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedIndex {
    entries: IndexMap<String, Option<MappedRecord>>,
    remaining: usize,
}

impl MappedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record. A replaced record keeps its original
    /// position. Returns the record previously stored under `id`, if any.
    pub fn insert(&mut self, id: String, record: MappedRecord) -> Option<MappedRecord> {
        match self.entries.get_mut(&id) {
            Some(slot) => {
                let previous = slot.replace(record);
                if previous.is_none() {
                    self.remaining += 1;
                }
                previous
            }
            None => {
                self.entries.insert(id, Some(record));
                self.remaining += 1;
                None
            }
        }
    }

    /// Take the record stored under `id`. Each record can be consumed once.
    pub fn consume(&mut self, id: &str) -> Option<MappedRecord> {
        let taken = self.entries.get_mut(id).and_then(Option::take);
        if taken.is_some() {
            self.remaining -= 1;
        }
        taken
    }

    pub fn get(&self, id: &str) -> Option<&MappedRecord> {
        self.entries.get(id).and_then(Option::as_ref)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Number of records not yet consumed.
    pub fn len(&self) -> usize {
        self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    /// Unconsumed entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MappedRecord)> {
        self.entries
            .iter()
            .filter_map(|(id, slot)| slot.as_ref().map(|r| (id.as_str(), r)))
    }

    /// Unconsumed records in first-insertion order.
    pub fn into_remaining(self) -> impl Iterator<Item = MappedRecord> {
        self.entries.into_values().flatten()
    }
}

/// Map every source record and index it by identifier.
///
/// Fails on the first record that lacks a mapped field or carries an
/// unusable identifier; no partial index is returned.
pub fn map_all(
    sources: &[SourceRecord],
    mapping: &FieldMapping,
    duplicates: DuplicatePolicy,
) -> Result<MappedIndex, ReconError> {
    let mut index = MappedIndex::new();

    for (i, record) in sources.iter().enumerate() {
        let id_value = record.get(mapping.identifier_field()).ok_or_else(|| {
            ReconError::MissingField {
                index: i,
                record_id: None,
                field: mapping.identifier_field().to_string(),
            }
        })?;
        let id = scalar_key(id_value).ok_or_else(|| ReconError::InvalidIdentifier {
            index: i,
            field: mapping.identifier_field().to_string(),
        })?;

        let mapped = mapping.map_record(i, record)?;

        if duplicates == DuplicatePolicy::Reject && index.contains(&id) {
            return Err(ReconError::DuplicateIdentifier { id });
        }
        index.insert(id, mapped);
    }

    Ok(index)
}
