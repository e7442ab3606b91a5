//! # Input Reader
//!
//! Reads the complete user-data document from a file or from standard
//! input. Content is returned as-is: no line-ending normalization and no
//! trimming.

use std::fmt;
use std::io::{self, Read};
use std::path::PathBuf;

use thiserror::Error;

use crate::error::ErrorKind;

/// Where the user data comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InputSource {
    /// The process's standard input stream.
    #[default]
    Stdin,
    /// A file on disk.
    Path(PathBuf),
}

impl InputSource {
    /// `Some(path)` becomes [`InputSource::Path`], `None` becomes stdin.
    pub fn from_optional_path(path: Option<PathBuf>) -> Self {
        path.map_or(Self::Stdin, Self::Path)
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => f.write_str("<stdin>"),
            Self::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

/// Failure to obtain the raw document.
#[derive(Error, Debug)]
pub enum InputError {
    /// The source could not be opened or read, or was not valid UTF-8.
    #[error("cannot read input '{source_name}': {error}")]
    Read {
        /// Display name of the source (`<stdin>` or the path).
        source_name: String,
        /// Underlying I/O error.
        #[source]
        error: io::Error,
    },
}

impl InputError {
    /// Always [`ErrorKind::FileAccess`].
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::FileAccess
    }
}

/// Read the full document from `source`.
///
/// # Errors
///
/// Returns [`InputError::Read`] if the path does not exist, cannot be
/// read, or holds non-UTF-8 bytes.
pub fn read_input(source: &InputSource) -> Result<String, InputError> {
    let result = match source {
        InputSource::Stdin => read_from(io::stdin().lock()),
        InputSource::Path(path) => std::fs::read_to_string(path),
    };
    let text = result.map_err(|error| InputError::Read {
        source_name: source.to_string(),
        error,
    })?;
    tracing::debug!(source = %source, bytes = text.len(), "read user data");
    Ok(text)
}

fn read_from(mut reader: impl Read) -> io::Result<String> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    Ok(buf)
}
