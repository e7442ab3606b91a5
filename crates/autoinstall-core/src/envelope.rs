//! # Cloud-Config Envelope Parsing
//!
//! Autoinstall data normally arrives as cloud-config user data:
//!
//! ```text
//! ---                  (optional)
//! #cloud-config
//! autoinstall:
//!   version: 1
//! ```
//!
//! In cloud-config mode the first line (after an optional `---`) must be
//! exactly `#cloud-config` and the document must carry a top-level
//! `autoinstall` key, whose value is returned. In direct mode the document
//! is parsed and returned whole.
//!
//! Marker lines are compared byte-for-byte. `--- ` or ` #cloud-config`
//! do not match. Lines end at `\n`, `\r\n` or a bare `\r`.
//!
//! The `autoinstall` value must be a mapping; `autoinstall:` with nothing
//! under it is an error, not an empty section.

use serde_json::Value;
use thiserror::Error;

use crate::error::ErrorKind;
use crate::yaml::{json_type_name, yaml_to_json_value};

/// Optional YAML document-start line preceding the marker.
pub const DOCUMENT_SEPARATOR: &str = "---";

/// Required first line of a cloud-config document.
pub const CLOUD_CONFIG_MARKER: &str = "#cloud-config";

/// Key holding the autoinstall payload inside cloud-config.
pub const AUTOINSTALL_KEY: &str = "autoinstall";

/// Failure to extract autoinstall data from the raw document.
#[derive(Error, Debug)]
pub enum EnvelopeError {
    /// Cloud-config mode, but the marker line is absent.
    #[error(
        "Expected data to be wrapped in cloud-config but first line is not '#cloud-config'. \
         Try passing --no-expect-cloudconfig."
    )]
    MissingCloudConfigMarker,

    /// Cloud-config mode, but the document has no `autoinstall` key.
    #[error(
        "Expected data to be wrapped in cloud-config but could not find top level 'autoinstall' key."
    )]
    MissingAutoinstallKey,

    /// The `autoinstall` value is present but empty or not a mapping.
    #[error("Expected the 'autoinstall' section to be a mapping, found {found}.")]
    AutoinstallNotMapping {
        /// JSON type name of the value that was found.
        found: &'static str,
    },

    /// The document is not well-formed YAML.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The YAML parsed but has no JSON equivalent.
    #[error("YAML-to-JSON conversion failed: {0}")]
    Conversion(String),
}

impl EnvelopeError {
    /// Always [`ErrorKind::Format`].
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Format
    }
}

/// Parse user data and return the autoinstall data to validate.
///
/// With `expect_cloudconfig` set, delegates to [`parse_cloud_config`].
/// Otherwise the whole document is returned; a top-level `autoinstall`
/// key, if present, is unwrapped later by the schema validator.
pub fn parse_autoinstall(text: &str, expect_cloudconfig: bool) -> Result<Value, EnvelopeError> {
    tracing::debug!(expect_cloudconfig, "parsing user data");
    if expect_cloudconfig {
        parse_cloud_config(text)
    } else {
        let yaml: serde_yaml::Value = serde_yaml::from_str(text)?;
        yaml_to_json_value(&yaml).map_err(EnvelopeError::Conversion)
    }
}

/// Unwrap the `autoinstall` section from a cloud-config document.
///
/// Only the `autoinstall` subtree is converted to JSON, so sibling
/// cloud-config keys never cause a conversion failure.
///
/// # Errors
///
/// - [`EnvelopeError::MissingCloudConfigMarker`] if the first line (after
///   an optional `---`) is not exactly `#cloud-config`, including for
///   empty input.
/// - [`EnvelopeError::Yaml`] if the remainder is not valid YAML.
/// - [`EnvelopeError::MissingAutoinstallKey`] if the document is not a
///   mapping with an `autoinstall` key.
/// - [`EnvelopeError::AutoinstallNotMapping`] if the key holds null, a
///   scalar, or a sequence.
pub fn parse_cloud_config(text: &str) -> Result<Value, EnvelopeError> {
    let mut lines = split_lines(text);
    if lines.first() == Some(&DOCUMENT_SEPARATOR) {
        lines.remove(0);
    }
    if lines.first() != Some(&CLOUD_CONFIG_MARKER) {
        return Err(EnvelopeError::MissingCloudConfigMarker);
    }

    let cleaned = lines.join("\n");
    let document: serde_yaml::Value = serde_yaml::from_str(&cleaned)?;
    let autoinstall = document
        .get(AUTOINSTALL_KEY)
        .ok_or(EnvelopeError::MissingAutoinstallKey)?;

    let autoinstall = yaml_to_json_value(autoinstall).map_err(EnvelopeError::Conversion)?;
    if !autoinstall.is_object() {
        return Err(EnvelopeError::AutoinstallNotMapping {
            found: json_type_name(&autoinstall),
        });
    }
    Ok(autoinstall)
}

/// Split on `\n`, `\r\n` and bare `\r`, without a trailing empty line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(|c: char| c == '\r' || c == '\n') {
            Some(end) => {
                lines.push(&rest[..end]);
                let width = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + width..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn separator_then_marker() {
        let data = parse_cloud_config("---\n#cloud-config\nautoinstall:\n  version: 1\n").unwrap();
        assert_eq!(data, json!({"version": 1}));
    }

    #[test]
    fn marker_without_separator() {
        let data = parse_cloud_config("#cloud-config\nautoinstall:\n  version: 1\n").unwrap();
        assert_eq!(data, json!({"version": 1}));
    }

    #[test]
    fn crlf_line_endings() {
        let data =
            parse_cloud_config("---\r\n#cloud-config\r\nautoinstall:\r\n  version: 1\r\n").unwrap();
        assert_eq!(data, json!({"version": 1}));
    }

    #[test]
    fn sibling_keys_are_ignored() {
        let data = parse_cloud_config(
            "#cloud-config\npackages:\n  - vim\nautoinstall:\n  version: 1\n  locale: en_US.UTF-8\n",
        )
        .unwrap();
        assert_eq!(data, json!({"version": 1, "locale": "en_US.UTF-8"}));
    }

    #[test]
    fn missing_marker_suggests_flag() {
        let err = parse_cloud_config("autoinstall:\n  version: 1\n").unwrap_err();
        assert!(matches!(err, EnvelopeError::MissingCloudConfigMarker));
        let msg = err.to_string();
        assert!(msg.contains("'#cloud-config'"), "got: {msg}");
        assert!(msg.contains("--no-expect-cloudconfig"), "got: {msg}");
    }

    #[test]
    fn empty_input_fails_marker_check() {
        let err = parse_cloud_config("").unwrap_err();
        assert!(matches!(err, EnvelopeError::MissingCloudConfigMarker));
    }

    #[test]
    fn separator_only_fails_marker_check() {
        let err = parse_cloud_config("---\n").unwrap_err();
        assert!(matches!(err, EnvelopeError::MissingCloudConfigMarker));
    }

    #[test]
    fn marker_comparison_is_exact() {
        for text in [
            "#cloud-config \nautoinstall: {}\n",
            " #cloud-config\nautoinstall: {}\n",
            "#Cloud-Config\nautoinstall: {}\n",
            "--- \n#cloud-config\nautoinstall: {}\n",
            "\n#cloud-config\nautoinstall: {}\n",
        ] {
            let err = parse_cloud_config(text).unwrap_err();
            assert!(
                matches!(err, EnvelopeError::MissingCloudConfigMarker),
                "accepted {text:?}"
            );
        }
    }

    #[test]
    fn only_one_separator_is_dropped() {
        let err = parse_cloud_config("---\n---\n#cloud-config\nautoinstall: {}\n").unwrap_err();
        assert!(matches!(err, EnvelopeError::MissingCloudConfigMarker));
    }

    #[test]
    fn missing_autoinstall_key() {
        let err = parse_cloud_config("#cloud-config\npackages:\n  - vim\n").unwrap_err();
        assert!(matches!(err, EnvelopeError::MissingAutoinstallKey));
        assert!(err.to_string().contains("'autoinstall' key"));
    }

    #[test]
    fn marker_only_document_has_no_autoinstall_key() {
        let err = parse_cloud_config("#cloud-config\n").unwrap_err();
        assert!(matches!(err, EnvelopeError::MissingAutoinstallKey));
    }

    #[test]
    fn non_mapping_document_has_no_autoinstall_key() {
        let err = parse_cloud_config("#cloud-config\n- autoinstall\n").unwrap_err();
        assert!(matches!(err, EnvelopeError::MissingAutoinstallKey));
    }

    #[test]
    fn null_autoinstall_value_is_rejected() {
        let err = parse_cloud_config("#cloud-config\nautoinstall:\n").unwrap_err();
        assert!(
            matches!(err, EnvelopeError::AutoinstallNotMapping { found: "null" }),
            "got: {err:?}"
        );
        assert_eq!(err.kind(), ErrorKind::Format);
        assert!(err.to_string().contains("found null"));
    }

    #[test]
    fn scalar_and_sequence_autoinstall_values_are_rejected() {
        for (text, found) in [
            ("#cloud-config\nautoinstall: 1\n", "number"),
            ("#cloud-config\nautoinstall: yes\n", "string"),
            ("#cloud-config\nautoinstall:\n  - version\n", "array"),
        ] {
            match parse_cloud_config(text) {
                Err(EnvelopeError::AutoinstallNotMapping { found: f }) => assert_eq!(f, found),
                other => panic!("expected AutoinstallNotMapping for {text:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn yaml_1_1_booleans_stay_strings() {
        let data = parse_cloud_config(
            "#cloud-config\nautoinstall:\n  ssh:\n    allow-pw: yes\n    install-server: on\n",
        )
        .unwrap();
        assert_eq!(data["ssh"]["allow-pw"], json!("yes"));
        assert_eq!(data["ssh"]["install-server"], json!("on"));
    }

    #[test]
    fn empty_autoinstall_mapping_is_accepted() {
        let data = parse_cloud_config("#cloud-config\nautoinstall: {}\n").unwrap();
        assert_eq!(data, json!({}));
    }

    #[test]
    fn bare_carriage_return_line_endings() {
        let data = parse_cloud_config("#cloud-config\rautoinstall:\r  version: 1\r").unwrap();
        assert_eq!(data, json!({"version": 1}));
        let data = parse_cloud_config("---\r#cloud-config\rautoinstall:\r  version: 1\r").unwrap();
        assert_eq!(data, json!({"version": 1}));
    }

    #[test]
    fn split_lines_handles_every_terminator() {
        assert!(split_lines("").is_empty());
        assert_eq!(split_lines("a\nb\r\nc\rd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines("a\n"), vec!["a"]);
        assert_eq!(split_lines("\n\na"), vec!["", "", "a"]);
        assert_eq!(split_lines("a\r\r\nb"), vec!["a", "", "b"]);
    }

    #[test]
    fn malformed_yaml_is_format_error() {
        let err = parse_cloud_config("#cloud-config\nautoinstall: [1, 2\n").unwrap_err();
        assert!(matches!(err, EnvelopeError::Yaml(_)));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn direct_mode_returns_whole_document() {
        let data = parse_autoinstall("autoinstall:\n  version: 1\n", false).unwrap();
        assert_eq!(data, json!({"autoinstall": {"version": 1}}));
    }

    #[test]
    fn direct_mode_skips_marker_check() {
        let data = parse_autoinstall("version: 1\n", false).unwrap();
        assert_eq!(data, json!({"version": 1}));
    }

    #[test]
    fn direct_mode_keeps_cloud_config_marker_as_comment() {
        let data = parse_autoinstall("#cloud-config\nautoinstall:\n  version: 1\n", false).unwrap();
        assert_eq!(data, json!({"autoinstall": {"version": 1}}));
    }

    #[test]
    fn default_mode_dispatches_to_cloud_config() {
        let err = parse_autoinstall("version: 1\n", true).unwrap_err();
        assert!(matches!(err, EnvelopeError::MissingCloudConfigMarker));
    }
}
