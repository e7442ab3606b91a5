//! # Validation Pipeline
//!
//! read → unwrap envelope → validate, with every stage's error funnelled
//! into one [`Outcome`].

use anyhow::Result;

use autoinstall_core::{parse_autoinstall, read_input, EnvelopeError, ErrorKind, InputError};
use autoinstall_schema::{verify, SchemaValidationError};

use crate::config::ValidatorConfig;

/// Line printed when the document validates.
pub const SUCCESS_MESSAGE: &str =
    "Success: The provided autoinstall config validated successfully";

/// Run the full pipeline for one document.
///
/// # Errors
///
/// Propagates the first stage failure unchanged: [`InputError`],
/// [`EnvelopeError`], or [`SchemaValidationError`].
pub fn run(config: &ValidatorConfig) -> Result<()> {
    let user_data = read_input(&config.input)?;
    let ai_data = parse_autoinstall(&user_data, config.expect_cloudconfig)?;
    verify(&ai_data, &config.json_schema)?;
    tracing::info!(
        input = %config.input,
        schema = %config.json_schema.display(),
        "autoinstall config validated"
    );
    Ok(())
}

/// Classify an error returned by [`run`].
pub fn error_kind(err: &anyhow::Error) -> Option<ErrorKind> {
    if let Some(e) = err.downcast_ref::<InputError>() {
        Some(e.kind())
    } else if let Some(e) = err.downcast_ref::<EnvelopeError>() {
        Some(e.kind())
    } else {
        err.downcast_ref::<SchemaValidationError>().map(|e| e.kind())
    }
}

/// Terminal state of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The document validated.
    Success,
    /// Some stage failed; holds the error message.
    Failure(String),
}

impl Outcome {
    /// The single stdout line for this outcome.
    pub fn message(&self) -> String {
        match self {
            Self::Success => SUCCESS_MESSAGE.to_string(),
            Self::Failure(reason) => format!("Failure: {reason}"),
        }
    }

    /// Process exit code: 0 on success, 1 for every failure kind.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure(_) => 1,
        }
    }
}

impl From<Result<()>> for Outcome {
    fn from(result: Result<()>) -> Self {
        match result {
            Ok(()) => Self::Success,
            Err(e) => {
                let kind = error_kind(&e).map_or("unknown", |k| k.as_str());
                tracing::debug!(kind, "validation failed");
                Self::Failure(e.to_string())
            }
        }
    }
}
