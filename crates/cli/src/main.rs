// orgsync - reconcile CRM customer records against monitoring organizations

mod exit_codes;
mod plan;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{
    EXIT_FORMAT, EXIT_INVALID_CONFIG, EXIT_IO, EXIT_RECON, EXIT_SUCCESS, EXIT_USAGE,
};
use orgsync_io::LoadError;
use orgsync_recon::ReconError;

#[derive(Parser)]
#[command(name = "orgsync")]
#[command(about = "Plan the changes that bring monitoring organizations in line with the CRM")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare CRM customers with monitoring organizations and emit a plan
    #[command(after_help = "\
Examples:
  orgsync plan --sources customers.json --targets orgs.json --output plan
  orgsync plan --sources customers.yml --targets orgs.yml --json
  orgsync plan --sources customers.json --targets orgs.json --report run.json
  orgsync plan --sources customers.json --targets orgs.json --config sync.toml --check")]
    Plan {
        /// CRM customer records (.json, .yml or .yaml)
        #[arg(long, env = "ORGSYNC_SOURCES")]
        sources: PathBuf,

        /// Monitoring organization records (.json, .yml or .yaml)
        #[arg(long, env = "ORGSYNC_TARGETS")]
        targets: PathBuf,

        /// Sync config (TOML). Defaults to the built-in field mapping
        #[arg(long, env = "ORGSYNC_CONFIG")]
        config: Option<PathBuf>,

        /// Write the plan to this file (.json appended when there is no extension)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Write the full run report (meta, summary and plan) to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Print the plan as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Exit with code 1 when the plan is not empty
        #[arg(long)]
        check: bool,

        /// Only log warnings and errors
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Validate a sync config without running
    #[command(after_help = "\
Examples:
  orgsync validate sync.toml")]
    Validate {
        /// Path to the sync config
        config: PathBuf,
    },
}

fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Plan { sources, targets, config, output, report, json, check, quiet } => {
            init_logging(quiet);
            plan::cmd_plan(plan::PlanArgs {
                sources,
                targets,
                config,
                output,
                report,
                json,
                check,
            })
        }
        Commands::Validate { config } => {
            init_logging(false);
            plan::cmd_validate(config)
        }
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    /// Exit silently with `code`; the command already reported what happened.
    pub fn silent(code: u8) -> Self {
        Self { code, message: String::new(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<LoadError> for CliError {
    fn from(err: LoadError) -> Self {
        let code = match err {
            LoadError::UnsupportedFormat { .. } => EXIT_FORMAT,
            LoadError::Read { .. } | LoadError::Parse { .. } | LoadError::Write { .. } => EXIT_IO,
        };
        Self { code, message: err.to_string(), hint: None }
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::MissingField { .. } => {
                Some("every source record must carry each mapped field")
            }
            ReconError::DuplicateIdentifier { .. } => {
                Some("set duplicate_ids = \"last_wins\" in the sync config to keep the last record")
            }
            _ => None,
        };
        let code = match &err {
            ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
            _ => EXIT_RECON,
        };
        Self { code, message: err.to_string(), hint: hint.map(str::to_string) }
    }
}
