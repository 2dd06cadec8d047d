//! CLI Exit Code Registry
//!
//! Single source of truth for `orgsync` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                                     |
//! |------|-------------------------------------------------------------|
//! | 0    | Success                                                     |
//! | 1    | `plan --check` found work to do (like `diff(1)`)            |
//! | 2    | Usage error (bad arguments)                                 |
//! | 3    | Input file format not supported                             |
//! | 4    | Input/output failure (read, parse or write)                 |
//! | 5    | Reconciliation failed (missing field, bad or duplicate id)  |
//! | 6    | Invalid sync config                                         |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// `--check` was given and the plan contains at least one task.
pub const EXIT_PLAN_NOT_EMPTY: u8 = 1;

/// Usage error - bad arguments. clap exits with the same code on its own.
pub const EXIT_USAGE: u8 = 2;

/// Input file extension is not .json, .yml or .yaml.
pub const EXIT_FORMAT: u8 = 3;

/// File could not be read, parsed or written.
pub const EXIT_IO: u8 = 4;

/// Engine rejected the source data.
pub const EXIT_RECON: u8 = 5;

/// Sync config could not be parsed or failed validation.
pub const EXIT_INVALID_CONFIG: u8 = 6;
