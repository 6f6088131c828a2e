//! Engine-level errors
//!
//! Malformed file content never produces an [`EngineError`]; it is reported
//! as accumulated diagnostics inside a result. These variants cover the
//! remaining failure modes: configuration lookups, bad caller input and the
//! effectful persistence step.

use std::path::PathBuf;

use rxfeed_config::RegistryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Unknown client/category pair or a layout of the wrong shape
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Unknown file category '{0}'. Expected claims, accumulator, accumulator_10pm or eligibility.")]
    UnknownCategory(String),

    #[error("Invalid expected date '{0}'. Expected CCYYMMDD.")]
    InvalidExpectedDate(String),

    #[error("Failed to write corrected file {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;
