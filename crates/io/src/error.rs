use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum LoadError {
    /// Input file extension is not one of the supported formats.
    UnsupportedFormat { path: PathBuf },
    /// File could not be read.
    Read { path: PathBuf, message: String },
    /// File contents are not a list of records in the detected format.
    Parse { path: PathBuf, message: String },
    /// Output could not be serialized or written.
    Write { path: PathBuf, message: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat { path } => write!(
                f,
                "{}: file format not supported (expected .json, .yml or .yaml)",
                path.display()
            ),
            Self::Read { path, message } => write!(f, "cannot read {}: {message}", path.display()),
            Self::Parse { path, message } => {
                write!(f, "cannot parse {}: {message}", path.display())
            }
            Self::Write { path, message } => {
                write!(f, "cannot write {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {}
