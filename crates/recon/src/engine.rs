use crate::config::SyncConfig;
use crate::error::ReconError;
use crate::mapping::map_all;
use crate::matcher::classify;
use crate::model::{ReconInput, ReconMeta, ReconResult};
use crate::observer::{timed, NoopObserver, ReconObserver};
use crate::plan::TaskAccumulator;

/// Run reconciliation per config. Returns the change plan + summary.
pub fn run(config: &SyncConfig, input: &ReconInput) -> Result<ReconResult, ReconError> {
    run_with_observer(config, input, &NoopObserver)
}

/// Same as [`run`], reporting progress and timings to `observer`.
///
/// Targets are processed strictly in input order: each match consumes its
/// source entry, so a later target with the same key sees it gone.
pub fn run_with_observer(
    config: &SyncConfig,
    input: &ReconInput,
    observer: &dyn ReconObserver,
) -> Result<ReconResult, ReconError> {
    let mapping = config.field_mapping()?;

    timed(observer, "reconciliation", || -> Result<ReconResult, ReconError> {
        let mut index = timed(observer, "mapping", || {
            map_all(&input.sources, &mapping, config.duplicate_ids)
        })?;
        let mapped = index.len();
        observer.mapped(mapped);

        let mut acc = TaskAccumulator::new();
        for target in &input.targets {
            let outcome = classify(target, &mut index, mapping.correlation_key());
            observer.classified(target, &outcome);
            acc.record(outcome);
        }

        let created = acc.finalize(index);
        observer.creates_gathered(created);

        let summary = acc.summary(input.sources.len(), input.targets.len(), mapped);
        observer.completed(&summary);

        Ok(ReconResult {
            meta: ReconMeta {
                config_name: config.name.clone(),
                engine_version: env!("CARGO_PKG_VERSION").to_string(),
                run_at: chrono::Utc::now().to_rfc3339(),
            },
            summary,
            plan: acc.into_plan(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DuplicatePolicy;
    use crate::model::{Classification, PlanSummary, SourceRecord, TargetRecord};
    use serde_json::{json, Value};
    use std::cell::RefCell;
    use std::time::Duration;

    fn sources(value: Value) -> Vec<SourceRecord> {
        serde_json::from_value(value).unwrap()
    }

    fn targets(value: Value) -> Vec<TargetRecord> {
        serde_json::from_value(value).unwrap()
    }

    fn customer(sys_id: &str, name: &str, city: &str) -> Value {
        json!({
            "sys_id": sys_id,
            "name": name,
            "street": "",
            "city": city,
            "state": "NSW",
            "zip": "",
            "country": "Australia",
            "latitude": "",
            "longitude": ""
        })
    }

    fn org(uri: &str, crm_id: &str, company: &str, city: &str) -> Value {
        json!({
            "uri": uri,
            "details": {
                "crm_id": crm_id,
                "company": company,
                "address": "",
                "city": city,
                "state": "NSW",
                "zip": "",
                "country": "Australia",
                "latitude": "",
                "longitude": ""
            }
        })
    }

    #[test]
    fn source_only_becomes_create() {
        let input = ReconInput {
            sources: sources(json!([customer("A1", "Pearl", "Sydney")])),
            targets: vec![],
        };
        let result = run(&SyncConfig::default(), &input).unwrap();
        assert_eq!(
            serde_json::to_value(&result.plan).unwrap(),
            json!({
                "create": [{
                    "crm_id": "A1",
                    "company": "Pearl",
                    "address": "",
                    "city": "Sydney",
                    "state": "NSW",
                    "zip": "",
                    "country": "Australia",
                    "latitude": "",
                    "longitude": ""
                }],
                "update": [],
                "delete": []
            })
        );
    }

    #[test]
    fn target_only_becomes_delete() {
        let input = ReconInput {
            sources: vec![],
            targets: targets(json!([{"uri": "/org/1", "details": {"crm_id": "X"}}])),
        };
        let result = run(&SyncConfig::default(), &input).unwrap();
        assert!(result.plan.create.is_empty());
        assert!(result.plan.update.is_empty());
        assert_eq!(result.plan.delete, ["/org/1"]);
    }

    #[test]
    fn changed_city_becomes_minimal_update() {
        let input = ReconInput {
            sources: sources(json!([customer("A1", "Pearl", "Sydney")])),
            targets: targets(json!([org("/org/7", "A1", "Pearl", "Melbourne")])),
        };
        let result = run(&SyncConfig::default(), &input).unwrap();
        assert_eq!(
            serde_json::to_value(&result.plan.update).unwrap(),
            json!([{"city": "Sydney", "uri": "/org/7"}])
        );
        assert!(result.plan.create.is_empty());
        assert!(result.plan.delete.is_empty());
    }

    #[test]
    fn agreeing_pair_produces_nothing() {
        let input = ReconInput {
            sources: sources(json!([customer("A1", "Pearl", "Sydney")])),
            targets: targets(json!([org("/org/7", "A1", "Pearl", "Sydney")])),
        };
        let result = run(&SyncConfig::default(), &input).unwrap();
        assert!(result.plan.is_empty());
        assert_eq!(result.summary.in_sync, 1);
    }

    #[test]
    fn keyless_target_is_ignored() {
        let input = ReconInput {
            sources: vec![],
            targets: targets(json!([{"uri": "/org/3", "details": {"company": "Internal"}}])),
        };
        let result = run(&SyncConfig::default(), &input).unwrap();
        assert!(result.plan.is_empty());
        assert_eq!(result.summary.ignored, 1);
    }

    #[test]
    fn falsy_target_keys_are_ignored_not_deleted() {
        for crm_id in [json!(0), json!(0.0), json!(false)] {
            let input = ReconInput {
                sources: vec![],
                targets: targets(json!([{"uri": "/org/1", "details": {"crm_id": crm_id}}])),
            };
            let result = run(&SyncConfig::default(), &input).unwrap();
            assert!(result.plan.delete.is_empty(), "crm_id {crm_id} was deleted");
            assert_eq!(result.summary.ignored, 1);
        }
    }

    #[test]
    fn meta_records_engine_version_and_run_time() {
        let before = chrono::Utc::now();
        let result = run(&SyncConfig::default(), &ReconInput::default()).unwrap();
        let run_at = chrono::DateTime::parse_from_rfc3339(&result.meta.run_at).unwrap();
        assert!(run_at >= before);
        assert!(run_at <= chrono::Utc::now());
        assert_eq!(result.meta.engine_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn mixed_run_summary() {
        let input = ReconInput {
            sources: sources(json!([
                customer("A1", "Pearl", "Sydney"),
                customer("B2", "Fortune", "Rowville"),
                customer("C3", "Harbour", "Newcastle"),
            ])),
            targets: targets(json!([
                org("/org/1", "A1", "Pearl", "Melbourne"),
                org("/org/2", "Z9", "Gone", "Perth"),
                {"uri": "/org/3", "details": {}},
                org("/org/4", "C3", "Harbour", "Newcastle"),
            ])),
        };
        let result = run(&SyncConfig::default(), &input).unwrap();
        assert_eq!(
            result.summary,
            PlanSummary {
                sources: 3,
                targets: 4,
                mapped: 3,
                create: 1,
                update: 1,
                delete: 1,
                in_sync: 1,
                ignored: 1,
            }
        );
        assert_eq!(result.plan.create[0].get("crm_id"), Some(&json!("B2")));
        assert_eq!(result.meta.config_name, "servicenow-monitoring");
        assert_eq!(result.meta.engine_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn missing_field_aborts_before_plan() {
        let mut broken = customer("A1", "Pearl", "Sydney");
        broken.as_object_mut().unwrap().remove("country");
        let input = ReconInput { sources: sources(json!([broken])), targets: vec![] };
        let err = run(&SyncConfig::default(), &input).unwrap_err();
        assert!(matches!(err, ReconError::MissingField { ref field, .. } if field == "country"));
    }

    #[test]
    fn duplicate_policy_follows_config() {
        let input = ReconInput {
            sources: sources(json!([
                customer("A1", "Pearl", "Sydney"),
                customer("A1", "Pearl", "Brisbane"),
            ])),
            targets: vec![],
        };
        let err = run(&SyncConfig::default(), &input).unwrap_err();
        assert_eq!(err, ReconError::DuplicateIdentifier { id: "A1".into() });

        let config =
            SyncConfig { duplicate_ids: DuplicatePolicy::LastWins, ..SyncConfig::default() };
        let result = run(&config, &input).unwrap();
        assert_eq!(result.plan.create.len(), 1);
        assert_eq!(result.plan.create[0].get("city"), Some(&json!("Brisbane")));
    }

    #[test]
    fn invalid_config_rejected_at_run() {
        let config = SyncConfig { correlation_key: "org_ref".into(), ..SyncConfig::default() };
        let err = run(&config, &ReconInput::default()).unwrap_err();
        assert!(matches!(err, ReconError::ConfigValidation(_)));
    }

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<String>>,
    }

    impl ReconObserver for Recorder {
        fn mapped(&self, count: usize) {
            self.events.borrow_mut().push(format!("mapped:{count}"));
        }
        fn classified(&self, target: &TargetRecord, outcome: &Classification) {
            let kind = match outcome {
                Classification::Ignored => "ignored",
                Classification::Delete { .. } => "delete",
                Classification::Update { .. } => "update",
                Classification::InSync { .. } => "in_sync",
            };
            self.events.borrow_mut().push(format!("{kind}:{}", target.uri));
        }
        fn creates_gathered(&self, count: usize) {
            self.events.borrow_mut().push(format!("create:{count}"));
        }
        fn completed(&self, summary: &PlanSummary) {
            let tasks = summary.create + summary.update + summary.delete;
            self.events.borrow_mut().push(format!("done:{tasks}"));
        }
        fn elapsed(&self, label: &str, _elapsed: Duration) {
            self.events.borrow_mut().push(format!("timed:{label}"));
        }
    }

    #[test]
    fn observer_sees_every_step_in_order() {
        let input = ReconInput {
            sources: sources(json!([
                customer("A1", "Pearl", "Sydney"),
                customer("B2", "Fortune", "Rowville"),
            ])),
            targets: targets(json!([
                org("/org/1", "A1", "Pearl", "Melbourne"),
                {"uri": "/org/2", "details": {}},
            ])),
        };
        let recorder = Recorder::default();
        run_with_observer(&SyncConfig::default(), &input, &recorder).unwrap();
        assert_eq!(
            *recorder.events.borrow(),
            [
                "timed:mapping",
                "mapped:2",
                "update:/org/1",
                "ignored:/org/2",
                "create:1",
                "done:2",
                "timed:reconciliation",
            ]
        );
    }
}
