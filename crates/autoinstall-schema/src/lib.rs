//! # autoinstall-schema — Schema Validation
//!
//! Validates autoinstall data against a JSON Schema document loaded from
//! disk.
//!
//! ## Design
//!
//! [`SchemaValidator`] reads and parses the schema file once per
//! construction; there is no cache across invocations. Validation is a
//! single go/no-go decision: the first violation found is reported as
//! [`SchemaValidationError::ValidationFailed`] with the JSON Pointer of the
//! offending value and the `jsonschema` crate's own message.
//!
//! [`verify`] accepts either the bare autoinstall section or a mapping that
//! still wraps it under a top-level `autoinstall` key.
//!
//! Schema `$ref`s are resolved from the local filesystem only. Remote
//! references are refused rather than fetched.

pub mod validate;

pub use validate::{select_autoinstall, verify, SchemaValidationError, SchemaValidator, Violation};
