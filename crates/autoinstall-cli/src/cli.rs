//! # Argument Parsing
//!
//! Clap surface of `validate-autoinstall`. Flag names are part of the
//! public contract: `--no-expect-cloudconfig` is referenced by the
//! missing-marker error message.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};

use autoinstall_core::InputSource;

use crate::config::{ValidatorConfig, DEFAULT_SCHEMA_PATH};

/// Validate an autoinstall config against a JSON Schema.
///
/// The data is expected to be cloud-config user data whose first line
/// (after an optional `---`) is `#cloud-config` and which carries the
/// autoinstall section under a top-level `autoinstall` key.
#[derive(Parser, Debug)]
#[command(name = "validate-autoinstall", version, about, long_about = None)]
pub struct Cli {
    /// Path to the user data instead of stdin ("-" also reads stdin).
    pub input: Option<PathBuf>,

    /// Assume the data is not wrapped in cloud-config.
    #[arg(long = "no-expect-cloudconfig", action = ArgAction::SetFalse)]
    pub expect_cloudconfig: bool,

    /// Path to JSON schema file.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SCHEMA_PATH)]
    pub json_schema: PathBuf,

    /// Log diagnostics to stderr. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Tracing filter directive for the requested verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl From<&Cli> for ValidatorConfig {
    fn from(cli: &Cli) -> Self {
        let input = match &cli.input {
            Some(path) if path.as_path() == Path::new("-") => InputSource::Stdin,
            other => InputSource::from_optional_path(other.clone()),
        };
        Self {
            input,
            expect_cloudconfig: cli.expect_cloudconfig,
            json_schema: cli.json_schema.clone(),
        }
    }
}
