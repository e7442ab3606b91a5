//! # autoinstall-cli — `validate-autoinstall` Command-Line Interface
//!
//! Reads user data, unwraps the autoinstall section, and validates it
//! against a JSON Schema:
//!
//! ```bash
//! validate-autoinstall user-data
//! validate-autoinstall --no-expect-cloudconfig autoinstall.yaml
//! cat user-data | validate-autoinstall --json-schema /path/to/autoinstall-schema.json
//! ```
//!
//! ## Output Contract
//!
//! Exactly one line on stdout, either
//! `Success: The provided autoinstall config validated successfully` (exit
//! 0) or `Failure: <details>` (exit 1). Every error kind maps to exit 1 so
//! scripts only need to test for zero. Diagnostics go to stderr via
//! `tracing`.

pub mod cli;
pub mod config;
pub mod run;

pub use cli::Cli;
pub use config::{ValidatorConfig, DEFAULT_SCHEMA_PATH};
pub use run::{error_kind, run, Outcome, SUCCESS_MESSAGE};
