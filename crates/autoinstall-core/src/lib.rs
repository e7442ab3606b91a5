//! # autoinstall-core — Input and Envelope Handling
//!
//! Turns raw autoinstall user data into the JSON value that the schema
//! validator consumes.
//!
//! ## Pipeline Stages
//!
//! - [`input`] reads the document from a file path or standard input.
//! - [`envelope`] strips the optional `---` separator, checks the
//!   `#cloud-config` marker, parses YAML, and extracts the `autoinstall`
//!   section.
//! - [`yaml`] converts the parsed YAML tree into a `serde_json::Value`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `autoinstall-*` crates (leaf of the DAG).
//! - No `.unwrap()` outside tests. Every stage returns a typed error that
//!   reports its [`ErrorKind`].

pub mod envelope;
pub mod error;
pub mod input;
pub mod yaml;

pub use envelope::{
    parse_autoinstall, parse_cloud_config, EnvelopeError, AUTOINSTALL_KEY, CLOUD_CONFIG_MARKER,
    DOCUMENT_SEPARATOR,
};
pub use error::ErrorKind;
pub use input::{read_input, InputError, InputSource};
pub use yaml::{json_type_name, yaml_to_json_value};
