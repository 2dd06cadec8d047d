use serde_json::Value;

use crate::mapping::{scalar_key, MappedIndex};
use crate::model::{Classification, Fields, MappedRecord, TargetRecord, UpdateTask};

/// Fields whose mapped value differs from the target's current value.
///
/// The mapped record is authoritative: every one of its fields is checked,
/// and a field the target lacks compares as `null`. Values are compared as
/// JSON values, so `"1"` and `1` differ, as do `""` and `null`.
pub fn diff(mapped: &MappedRecord, details: &Fields) -> Fields {
    mapped
        .0
        .iter()
        .filter(|(field, value)| details.get(field.as_str()).unwrap_or(&Value::Null) != *value)
        .map(|(field, value)| (field.clone(), value.clone()))
        .collect()
}

/// Correlation value of a target, if it has a usable one.
///
/// Absent, null, empty-string, zero, `false` and non-scalar values all mean
/// "no key".
pub fn correlation_value(target: &TargetRecord, correlation_key: &str) -> Option<String> {
    target
        .details
        .get(correlation_key)
        .filter(|value| !is_blank_key(value))
        .and_then(scalar_key)
        .filter(|key| !key.is_empty())
}

fn is_blank_key(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => !flag,
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

/// Match one target record against the mapped index.
///
/// A matched entry is consumed from `index`, so a second target carrying the
/// same key no longer finds it and is classified for deletion.
pub fn classify(
    target: &TargetRecord,
    index: &mut MappedIndex,
    correlation_key: &str,
) -> Classification {
    let Some(crm_id) = correlation_value(target, correlation_key) else {
        return Classification::Ignored;
    };

    match index.consume(&crm_id) {
        None => Classification::Delete {
            crm_id,
            uri: target.uri.clone(),
        },
        Some(mapped) => {
            let changes = diff(&mapped, &target.details);
            if changes.is_empty() {
                Classification::InSync { crm_id }
            } else {
                Classification::Update {
                    crm_id,
                    task: UpdateTask {
                        changes,
                        uri: target.uri.clone(),
                    },
                }
            }
        }
    }
}
