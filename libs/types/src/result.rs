//! # Validation Results
//!
//! `is_valid` is never stored independently of the error list: both result
//! types compute it from `errors` in their only constructors, so
//! `is_valid == errors.is_empty()` holds for every value that exists.

use serde::Serialize;

/// Outcome of validating one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    is_valid: bool,
    errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Single-error failure, used for configuration errors and wrapped fatal errors
    pub fn failure(message: impl Into<String>) -> Self {
        Self::from_errors(vec![message.into()])
    }

    /// Wrap an unexpected error into a failure result carrying its message
    pub fn from_fatal<E: std::fmt::Display>(error: E) -> Self {
        Self::failure(error.to_string())
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Errors joined with newlines, the form persisted by callers
    pub fn error_text(&self) -> String {
        self.errors.join("\n")
    }
}

/// Outcome of a combined validate-and-correct pass
///
/// `errors` holds validation errors followed by correction notes, so a file
/// with any automatic repair reads as invalid. `corrections` repeats just the
/// correction notes for auditing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorrectionResult {
    is_valid: bool,
    errors: Vec<String>,
    corrections: Vec<String>,
    corrected_lines: Vec<String>,
}

impl CorrectionResult {
    pub fn new(
        validation_errors: Vec<String>,
        corrections: Vec<String>,
        corrected_lines: Vec<String>,
    ) -> Self {
        let mut errors = validation_errors;
        errors.extend(corrections.iter().cloned());
        Self {
            is_valid: errors.is_empty(),
            errors,
            corrections,
            corrected_lines,
        }
    }

    /// Failure with no corrected content
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(vec![message.into()], Vec::new(), Vec::new())
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn corrections(&self) -> &[String] {
        &self.corrections
    }

    pub fn corrected_lines(&self) -> &[String] {
        &self.corrected_lines
    }
}
