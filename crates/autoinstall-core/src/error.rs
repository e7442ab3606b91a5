//! # Error Taxonomy
//!
//! Every failure in the validation pipeline falls into one of three kinds.
//! The CLI maps all of them to the same exit code; the kind exists for
//! logging and for callers embedding the library.

use std::fmt;

/// Classification shared by the error types of every pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An input or schema file could not be opened or read.
    FileAccess,
    /// The envelope marker or `autoinstall` key is missing, or YAML/JSON
    /// syntax is malformed.
    Format,
    /// The data does not conform to the schema.
    SchemaValidation,
}

impl ErrorKind {
    /// Stable lowercase name, used as a structured logging field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileAccess => "file_access",
            Self::Format => "format",
            Self::SchemaValidation => "schema_validation",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
