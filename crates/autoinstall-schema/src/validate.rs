//! # Schema Validation
//!
//! Runtime validation of autoinstall data against a JSON Schema file.
//!
//! ## Schema Resolution
//!
//! The `$schema` keyword selects the draft. Without it the `jsonschema`
//! crate's default draft applies.
//!
//! `$ref`s without a base `$id` resolve under `json-schema:///`; this
//! module maps those, and `file://` URIs, to files relative to the schema's
//! own directory. Any other scheme is an error: validation never touches
//! the network.

use std::fmt;
use std::path::{Path, PathBuf};

use autoinstall_core::{json_type_name, ErrorKind, AUTOINSTALL_KEY};
use jsonschema::{Retrieve, Uri, ValidationOptions, Validator};
use serde_json::Value;
use thiserror::Error;

/// Base URI the `jsonschema` crate assigns to schemas without an `$id`.
const DEFAULT_BASE_URI: &str = "json-schema:///";

const FILE_URI_PREFIX: &str = "file://";

/// Resolves `$ref` URIs to files next to the root schema.
struct LocalSchemaRetriever {
    base_dir: PathBuf,
}

impl LocalSchemaRetriever {
    fn resolve_path(&self, uri: &str) -> Result<PathBuf, String> {
        let uri = uri.split('#').next().unwrap_or(uri);
        if let Some(path) = uri.strip_prefix(FILE_URI_PREFIX) {
            Ok(PathBuf::from(path))
        } else if let Some(relative) = uri.strip_prefix(DEFAULT_BASE_URI) {
            Ok(self.base_dir.join(relative))
        } else {
            Err(format!("refusing to retrieve non-local schema reference '{uri}'"))
        }
    }
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let path = self.resolve_path(uri.as_str())?;
        tracing::debug!(uri = uri.as_str(), path = %path.display(), "retrieving referenced schema");
        let content = std::fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Error during schema loading or validation.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The schema file could not be opened or read.
    #[error("cannot read schema '{path}': {source}")]
    SchemaLoad {
        /// Path to the schema file.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The schema file is not valid JSON.
    #[error("invalid JSON in schema '{path}': {source}")]
    SchemaFormat {
        /// Path to the schema file.
        path: String,
        /// Parser error, with line and column.
        #[source]
        source: serde_json::Error,
    },

    /// The schema is valid JSON but not a usable JSON Schema.
    #[error("invalid JSON schema '{path}': {reason}")]
    InvalidSchema {
        /// Path to the schema file.
        path: String,
        /// Reason the validator could not be built.
        reason: String,
    },

    /// The selected autoinstall data is null, a scalar, or a sequence.
    #[error("expected autoinstall data to be a mapping, found {found}")]
    NotAMapping {
        /// JSON type name of the selected value.
        found: &'static str,
    },

    /// The data did not conform to the schema.
    #[error("validation failed against schema '{schema_name}': {violation}")]
    ValidationFailed {
        /// Path of the schema that was validated against.
        schema_name: String,
        /// First violation detected.
        violation: Violation,
    },
}

impl SchemaValidationError {
    /// Map this error onto the pipeline-wide taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SchemaLoad { .. } => ErrorKind::FileAccess,
            Self::SchemaFormat { .. } | Self::InvalidSchema { .. } | Self::NotAMapping { .. } => {
                ErrorKind::Format
            }
            Self::ValidationFailed { .. } => ErrorKind::SchemaValidation,
        }
    }
}

/// A single validation violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer path to the violating value in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description, as produced by `jsonschema`.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.instance_path, self.message)
        }
    }
}

/// A JSON Schema loaded from one file, backed by the `jsonschema` crate.
#[derive(Debug)]
pub struct SchemaValidator {
    schema_path: PathBuf,
    schema: Value,
}

impl SchemaValidator {
    /// Read and parse the schema at `schema_path`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::SchemaLoad`] if the file cannot be
    /// read and [`SchemaValidationError::SchemaFormat`] if it is not JSON.
    pub fn load(schema_path: impl AsRef<Path>) -> Result<Self, SchemaValidationError> {
        let schema_path = schema_path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&schema_path).map_err(|source| {
            SchemaValidationError::SchemaLoad {
                path: schema_path.display().to_string(),
                source,
            }
        })?;
        let schema: Value = serde_json::from_str(&content).map_err(|source| {
            SchemaValidationError::SchemaFormat {
                path: schema_path.display().to_string(),
                source,
            }
        })?;
        tracing::debug!(schema = %schema_path.display(), "loaded JSON schema");
        Ok(Self {
            schema_path,
            schema,
        })
    }

    /// Path the schema was loaded from.
    pub fn schema_path(&self) -> &Path {
        &self.schema_path
    }

    /// The parsed schema document.
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    fn build_options(&self) -> ValidationOptions {
        let base_dir = self
            .schema_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let mut opts = jsonschema::options();
        opts.with_retriever(LocalSchemaRetriever { base_dir });
        opts
    }

    /// Compile the schema into a reusable `Validator`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::InvalidSchema`] if the document is
    /// not a valid schema or a `$ref` cannot be resolved locally.
    pub fn build_validator(&self) -> Result<Validator, SchemaValidationError> {
        self.build_options().build(&self.schema).map_err(|e| {
            SchemaValidationError::InvalidSchema {
                path: self.schema_path.display().to_string(),
                reason: e.to_string(),
            }
        })
    }

    /// Validate `instance` against the schema, stopping at the first
    /// violation.
    pub fn validate_document(&self, instance: &Value) -> Result<(), SchemaValidationError> {
        let validator = self.build_validator()?;

        let first = validator.iter_errors(instance).next().map(|e| Violation {
            instance_path: e.instance_path.to_string(),
            schema_path: e.schema_path.to_string(),
            message: e.to_string(),
        });

        match first {
            None => Ok(()),
            Some(violation) => Err(SchemaValidationError::ValidationFailed {
                schema_name: self.schema_path.display().to_string(),
                violation,
            }),
        }
    }

    /// Validate autoinstall data, unwrapping a top-level `autoinstall` key
    /// if one is present.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::NotAMapping`] if the selected value
    /// is not an object, before the schema is consulted.
    pub fn verify(&self, ai_data: &Value) -> Result<(), SchemaValidationError> {
        let data = select_autoinstall(ai_data);
        if !data.is_object() {
            return Err(SchemaValidationError::NotAMapping {
                found: json_type_name(data),
            });
        }
        self.validate_document(data)
    }
}

/// Pick the value to validate: the content of a top-level `autoinstall`
/// key if `ai_data` is an object holding one, otherwise `ai_data` itself.
pub fn select_autoinstall(ai_data: &Value) -> &Value {
    ai_data.get(AUTOINSTALL_KEY).unwrap_or(ai_data)
}

/// Load the schema at `schema_path` and validate `ai_data` against it.
///
/// Accepts both the bare autoinstall section and a full user-data mapping
/// that wraps it under `autoinstall`.
pub fn verify(ai_data: &Value, schema_path: &Path) -> Result<(), SchemaValidationError> {
    SchemaValidator::load(schema_path)?.verify(ai_data)
}
