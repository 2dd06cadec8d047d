//! `orgsync plan` / `orgsync validate`.

use std::path::{Path, PathBuf};

use orgsync_io::{load_input, to_pretty_json, with_json_extension, write_plan};
use orgsync_recon::model::ReconMeta;
use orgsync_recon::{run_with_observer, LogObserver, PlanSummary, SyncConfig};

use crate::exit_codes::{EXIT_INVALID_CONFIG, EXIT_IO, EXIT_PLAN_NOT_EMPTY};
use crate::CliError;

pub struct PlanArgs {
    pub sources: PathBuf,
    pub targets: PathBuf,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub report: Option<PathBuf>,
    pub json: bool,
    pub check: bool,
}

fn plan_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

fn load_config(path: Option<&Path>) -> Result<SyncConfig, CliError> {
    let Some(path) = path else {
        log::debug!("no --config given, using the built-in field mapping");
        return Ok(SyncConfig::default());
    };
    let config_str = std::fs::read_to_string(path).map_err(|e| {
        plan_err(EXIT_IO, format!("cannot read config {}: {e}", path.display()))
    })?;
    SyncConfig::from_toml(&config_str).map_err(|e| {
        plan_err(EXIT_INVALID_CONFIG, format!("{}: {e}", path.display()))
    })
}

fn meta_line(meta: &ReconMeta) -> String {
    format!("{} (engine {}, run at {})", meta.config_name, meta.engine_version, meta.run_at)
}

fn summary_line(summary: &PlanSummary) -> String {
    format!(
        "{} to create, {} to update, {} to delete ({} in sync, {} ignored)",
        summary.create, summary.update, summary.delete, summary.in_sync, summary.ignored
    )
}

pub fn cmd_plan(args: PlanArgs) -> Result<(), CliError> {
    if args.sources == args.targets {
        return Err(CliError::args("--sources and --targets point at the same file")
            .with_hint("pass the CRM export and the monitoring export separately"));
    }

    let config = load_config(args.config.as_deref())?;
    let input = load_input(&args.sources, &args.targets)?;
    let result = run_with_observer(&config, &input, &LogObserver)?;

    if let Some(output) = &args.output {
        let path = with_json_extension(output);
        write_plan(&path, &result.plan)?;
        eprintln!("wrote {}", path.display());
    }

    if let Some(report) = &args.report {
        let path = with_json_extension(report);
        let content = to_pretty_json(&result)
            .map_err(|e| plan_err(EXIT_IO, format!("cannot serialize report: {e}")))?;
        std::fs::write(&path, content).map_err(|e| {
            plan_err(EXIT_IO, format!("cannot write {}: {e}", path.display()))
        })?;
        eprintln!("wrote {}", path.display());
    }

    if args.json {
        let json = to_pretty_json(&result.plan)
            .map_err(|e| plan_err(EXIT_IO, format!("cannot serialize plan: {e}")))?;
        println!("{json}");
    }

    eprintln!("{}: {}", meta_line(&result.meta), summary_line(&result.summary));

    if args.check && !result.plan.is_empty() {
        return Err(CliError::silent(EXIT_PLAN_NOT_EMPTY));
    }
    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(Some(&config_path))?;
    let mapping = config.field_mapping()?;
    println!(
        "valid: \"{}\" maps {} field(s), {} -> {}, duplicate ids: {}",
        config.name,
        mapping.rules().len(),
        mapping.identifier_field(),
        mapping.correlation_key(),
        config.duplicate_ids
    );
    Ok(())
}
