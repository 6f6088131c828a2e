//! # Validation Engine Entry Points
//!
//! ## Purpose
//!
//! Binds raw file bytes, a client name and a category to the layout that
//! governs them and runs the matching validator. This is the boundary where
//! configuration failures turn into single-error results.
//!
//! ## Architecture Role
//!
//! ```text
//! bytes + client + category
//!        │
//!        ▼
//!   decode_lines ──► LayoutRegistry::resolve ──┬─► StructureValidator (fixed width)
//!                                              ├─► validate_edi       (ISA first line)
//!                                              └─► validate_delimited (tab rows)
//!        │
//!        ▼
//!   ValidationResult { is_valid, errors }   /   CorrectionResult (+ corrected_lines)
//! ```
//!
//! The engine holds only a shared reference to the registry, so one registry
//! can serve any number of concurrent validators.

use std::path::Path;

use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;
use rxfeed_config::LayoutRegistry;
use rxfeed_types::{CorrectionResult, DateFormat, FileCategory, Layout, ValidationResult};
use tracing::{debug, info, warn};

use crate::corrector::{correct_lines, persist_corrected};
use crate::decode::decode_lines;
use crate::diagnostic::{render, Diagnostic};
use crate::error::{EngineError, EngineResult};
use crate::validation::content::matches_date;
use crate::validation::{is_edi, validate_delimited, validate_edi, StructureValidator};

static PBLXV_FILENAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"PBLXV426_P_.*_(\d{8})\.txt$").expect("valid regex"));

/// Caller-supplied context for one validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRequest<'a> {
    pub client: &'a str,
    pub category: FileCategory,
    /// Date (CCYYMMDD) filename tokens must carry; overrides `filename`
    pub expected_date: Option<&'a str>,
    /// Original file name, used to derive the expected date
    pub filename: Option<&'a str>,
    /// Check filename tokens against today when no date is supplied
    pub today_fallback: bool,
}

impl<'a> ValidationRequest<'a> {
    pub fn new(client: &'a str, category: FileCategory) -> Self {
        Self {
            client,
            category,
            expected_date: None,
            filename: None,
            today_fallback: true,
        }
    }

    pub fn with_expected_date(mut self, date: Option<&'a str>) -> Self {
        self.expected_date = date;
        self
    }

    pub fn with_filename(mut self, filename: Option<&'a str>) -> Self {
        self.filename = filename;
        self
    }

    pub fn with_today_fallback(mut self, enabled: bool) -> Self {
        self.today_fallback = enabled;
        self
    }

    /// Expected date given explicitly, if valid
    fn explicit_date(&self) -> EngineResult<Option<String>> {
        match self.expected_date {
            Some(date) if matches_date(date, DateFormat::Ccyymmdd) => {
                Ok(Some(date.to_string()))
            }
            Some(date) => Err(EngineError::InvalidExpectedDate(date.to_string())),
            None => Ok(None),
        }
    }

    /// Explicit date, else the date in a `PBLXV426_P_*_CCYYMMDD.txt` filename
    fn supplied_date(&self) -> EngineResult<Option<String>> {
        if let Some(date) = self.explicit_date()? {
            return Ok(Some(date));
        }
        Ok(self.filename.and_then(date_from_filename))
    }

    /// Supplied date, else today
    fn resolved_date(&self) -> EngineResult<String> {
        Ok(self
            .supplied_date()?
            .unwrap_or_else(|| Local::now().format("%Y%m%d").to_string()))
    }

    /// Date filename tokens are checked against; `None` skips the check
    fn token_date(&self) -> EngineResult<Option<String>> {
        if self.today_fallback {
            self.resolved_date().map(Some)
        } else {
            self.supplied_date()
        }
    }
}

/// Date embedded in a PBLXV426 accumulator filename
pub fn date_from_filename(filename: &str) -> Option<String> {
    PBLXV_FILENAME
        .captures(filename)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Layout-driven validator over a shared registry
#[derive(Debug, Clone, Copy)]
pub struct FileValidator<'r> {
    registry: &'r LayoutRegistry,
}

impl<'r> FileValidator<'r> {
    pub fn new(registry: &'r LayoutRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r LayoutRegistry {
        self.registry
    }

    /// Validate `content` for `client`; `category` is parsed leniently
    ///
    /// Never fails: configuration problems become a single-error result.
    pub fn validate(&self, content: &[u8], client: &str, category: &str) -> ValidationResult {
        match category.parse::<FileCategory>() {
            Ok(category) => {
                self.validate_request(content, &ValidationRequest::new(client, category))
            }
            Err(_) => {
                ValidationResult::from_fatal(EngineError::UnknownCategory(category.to_string()))
            }
        }
    }

    /// [`try_validate`](Self::try_validate) with errors folded into the result
    pub fn validate_request(
        &self,
        content: &[u8],
        request: &ValidationRequest<'_>,
    ) -> ValidationResult {
        self.try_validate(content, request).unwrap_or_else(|e| {
            warn!(
                client = request.client,
                category = %request.category,
                "Validation aborted: {}",
                e
            );
            ValidationResult::from_fatal(e)
        })
    }

    /// Validate, keeping configuration errors distinct from findings
    pub fn try_validate(
        &self,
        content: &[u8],
        request: &ValidationRequest<'_>,
    ) -> EngineResult<ValidationResult> {
        let diagnostics = self.diagnose(content, request)?;
        let result = ValidationResult::from_errors(render(&diagnostics));
        info!(
            client = request.client,
            category = %request.category,
            errors = result.errors().len(),
            "{} Validation finished",
            if result.is_valid() { "✅" } else { "❌" }
        );
        Ok(result)
    }

    /// Ordered diagnostics for `content`
    pub fn diagnose(
        &self,
        content: &[u8],
        request: &ValidationRequest<'_>,
    ) -> EngineResult<Vec<Diagnostic>> {
        let layout = self.registry.resolve(request.client, request.category)?;
        let lines = decode_lines(content);
        debug!(
            client = request.client,
            layout = layout.name(),
            version = layout.version(),
            lines = lines.len(),
            "Resolved layout"
        );

        if lines.is_empty() {
            return Ok(vec![Diagnostic::EmptyFile]);
        }

        let diagnostics = match layout {
            Layout::FixedWidth(family) => {
                let expected = match family.filename_token {
                    Some(_) => request.token_date()?,
                    None => None,
                };
                StructureValidator::new(family)
                    .with_client(self.registry.client(request.client))
                    .with_expected_date(expected.as_deref())
                    .validate(&lines)
            }
            Layout::Eligibility(eligibility) if is_edi(&lines) => match &eligibility.edi {
                Some(rules) => {
                    let text = String::from_utf8_lossy(content);
                    let expected = request.supplied_date()?;
                    validate_edi(&text, &lines[0], rules, expected.as_deref())
                }
                None => vec![Diagnostic::EdiUnsupported {
                    layout: eligibility.name.clone(),
                }],
            },
            Layout::Eligibility(eligibility) => {
                let selected = request.supplied_date()?;
                validate_delimited(&lines, eligibility, selected.as_deref())
            }
        };
        Ok(diagnostics)
    }

    /// Validate and correct an accumulator file, persisting to `output_path` when given
    ///
    /// Filename tokens are only checked when `expected_date` is given.
    /// Configuration problems are returned as a failure result; only the
    /// persistence step produces an `Err`. Nothing is written when there
    /// are no corrected lines.
    pub fn validate_and_correct(
        &self,
        content: &[u8],
        client: &str,
        expected_date: Option<&str>,
        output_path: Option<&Path>,
    ) -> EngineResult<CorrectionResult> {
        let request = ValidationRequest::new(client, FileCategory::Accumulator)
            .with_expected_date(expected_date)
            .with_today_fallback(false);
        let result = match self.correct(content, &request) {
            Ok(result) => result,
            Err(e) => {
                warn!(client, "Correction aborted: {}", e);
                return Ok(CorrectionResult::failure(e.to_string()));
            }
        };

        if let Some(path) = output_path.filter(|_| !result.corrected_lines().is_empty()) {
            persist_corrected(path, result.corrected_lines())?;
        }
        Ok(result)
    }

    /// Pure validate-and-correct pass for any fixed-width category
    ///
    /// `errors` holds the validation findings of the original content
    /// followed by one note per repair.
    pub fn correct(
        &self,
        content: &[u8],
        request: &ValidationRequest<'_>,
    ) -> EngineResult<CorrectionResult> {
        let family = self.registry.resolve_family(request.client, request.category)?;
        let lines = decode_lines(content);
        if lines.is_empty() {
            return Ok(CorrectionResult::failure(Diagnostic::EmptyFile.to_string()));
        }

        let findings = self.diagnose(content, request)?;
        let correction = correct_lines(&lines, family);
        info!(
            client = request.client,
            layout = %family.name,
            findings = findings.len(),
            repairs = correction.notes.len(),
            "🔧 Correction finished"
        );
        Ok(CorrectionResult::new(
            render(&findings),
            render(&correction.notes),
            correction.lines,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_from_filename() {
        assert_eq!(
            date_from_filename("PBLXV426_P_TransparentRx_20250429.txt"),
            Some("20250429".to_string())
        );
        assert_eq!(date_from_filename("PBLXV426_P_TransparentRx_2025042.txt"), None);
        assert_eq!(date_from_filename("UMR_ACCUM_20250429.txt"), None);
    }

    #[test]
    fn test_date_resolution_order() {
        let request = ValidationRequest::new("UMR", FileCategory::Accumulator)
            .with_expected_date(Some("20250101"))
            .with_filename(Some("PBLXV426_P_TransparentRx_20250429.txt"));
        assert_eq!(request.resolved_date().unwrap(), "20250101");

        let request = request.with_expected_date(None);
        assert_eq!(request.resolved_date().unwrap(), "20250429");

        let request = request.with_filename(None);
        assert_eq!(request.resolved_date().unwrap().len(), 8);
        assert_eq!(request.supplied_date().unwrap(), None);
    }

    #[test]
    fn test_token_date_without_today_fallback() {
        let request =
            ValidationRequest::new("UMR", FileCategory::Accumulator).with_today_fallback(false);
        assert_eq!(request.token_date().unwrap(), None);

        let request = request.with_expected_date(Some("20250429"));
        assert_eq!(request.token_date().unwrap().as_deref(), Some("20250429"));
    }

    #[test]
    fn test_bad_expected_date_rejected() {
        let request = ValidationRequest::new("UMR", FileCategory::Accumulator)
            .with_expected_date(Some("2025-04-29"));
        assert!(matches!(
            request.resolved_date(),
            Err(EngineError::InvalidExpectedDate(_))
        ));
    }
}
