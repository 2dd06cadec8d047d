// JSON / YAML record loading

use std::path::Path;

use serde::de::DeserializeOwned;

use orgsync_recon::model::{ReconInput, SourceRecord, TargetRecord};

use crate::error::LoadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
}

impl InputFormat {
    /// Detect the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yml") | Some("yaml") => Ok(Self::Yaml),
            _ => Err(LoadError::UnsupportedFormat { path: path.to_path_buf() }),
        }
    }
}

/// Parse a list of records. `path` is only used for error messages.
pub fn parse_records<T: DeserializeOwned>(
    data: &str,
    format: InputFormat,
    path: &Path,
) -> Result<Vec<T>, LoadError> {
    let parsed = match format {
        InputFormat::Json => serde_json::from_str(data).map_err(|e| e.to_string()),
        InputFormat::Yaml => serde_yaml::from_str(data).map_err(|e| e.to_string()),
    };
    parsed.map_err(|message| LoadError::Parse { path: path.to_path_buf(), message })
}

/// Read a list of records from a .json / .yml / .yaml file.
///
/// The extension is checked before the file is opened.
pub fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let format = InputFormat::from_path(path)?;
    let data = std::fs::read_to_string(path).map_err(|e| LoadError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let records = parse_records(&data, format, path)?;
    log::info!("loaded {} record(s) from {}", records.len(), path.display());
    Ok(records)
}

pub fn load_sources(path: &Path) -> Result<Vec<SourceRecord>, LoadError> {
    load_records(path)
}

pub fn load_targets(path: &Path) -> Result<Vec<TargetRecord>, LoadError> {
    load_records(path)
}

/// Load both sides of a run. Both formats are checked before either file is read.
pub fn load_input(sources: &Path, targets: &Path) -> Result<ReconInput, LoadError> {
    InputFormat::from_path(sources)?;
    InputFormat::from_path(targets)?;
    Ok(ReconInput {
        sources: load_sources(sources)?,
        targets: load_targets(targets)?,
    })
}
