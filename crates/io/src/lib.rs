// File I/O for reconciliation runs: record loading and plan output

pub mod error;
pub mod input;
pub mod output;

pub use error::LoadError;
pub use input::{load_input, load_records, load_sources, load_targets, InputFormat};
pub use output::{to_pretty_json, with_json_extension, write_plan};
