//! # Validator Configuration
//!
//! Everything one invocation needs, with the defaults made explicit.

use std::path::PathBuf;

use autoinstall_core::InputSource;

/// Schema file used when `--json-schema` is not given, resolved against
/// the current working directory.
pub const DEFAULT_SCHEMA_PATH: &str = "autoinstall-schema.json";

/// Settings for a single validation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Where to read the user data from.
    pub input: InputSource,
    /// Require the `#cloud-config` envelope and unwrap `autoinstall`.
    pub expect_cloudconfig: bool,
    /// Path to the JSON Schema document.
    pub json_schema: PathBuf,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            input: InputSource::Stdin,
            expect_cloudconfig: true,
            json_schema: PathBuf::from(DEFAULT_SCHEMA_PATH),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_reads_stdin_with_envelope() {
        let config = ValidatorConfig::default();
        assert_eq!(config.input, InputSource::Stdin);
        assert!(config.expect_cloudconfig);
        assert_eq!(config.json_schema, PathBuf::from("autoinstall-schema.json"));
    }
}
