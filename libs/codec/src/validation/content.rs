//! Content rules shared by fixed-width fields and delimited columns.
//!
//! Each check sees the trimmed, non-empty value only. The callers attach
//! line numbers and positions when turning a [`Violation`] into a diagnostic.

use once_cell::sync::Lazy;
use regex::Regex;
use rxfeed_types::{DateFormat, FieldRules, LogicalType, NumericMode};

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("valid regex"));
static SIGNED_DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d*\.?\d*$").expect("valid regex"));
static CCYYMMDD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{8}$").expect("valid regex"));
static HHMMSS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{6}$").expect("valid regex"));
static MM_DD_YYYY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}-\d{2}-\d{4}$").expect("valid regex"));

/// One violated content rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    NotNumeric,
    NotSignedNumeric,
    BadDateTime(DateFormat),
    NotAllowed,
}

/// Type, format and enum checks for a trimmed, non-empty value, in that order
pub fn check_value(rules: &FieldRules, value: &str) -> Vec<Violation> {
    let mut violations = Vec::new();
    if value.is_empty() || rules.is_filler() {
        return violations;
    }

    match rules.logical_type {
        LogicalType::Numeric if !is_numeric(value, rules.numeric_mode) => {
            violations.push(Violation::NotNumeric)
        }
        LogicalType::SignedDecimal if !is_signed_decimal(value) => {
            violations.push(Violation::NotSignedNumeric)
        }
        _ => {}
    }

    if let Some(format) = rules.date_format {
        if !matches_date(value, format) {
            violations.push(Violation::BadDateTime(format));
        }
    }

    if !rules.valid_values.is_empty() && !rules.valid_values.iter().any(|v| v == value) {
        violations.push(Violation::NotAllowed);
    }

    violations
}

/// Strict: digits only. Lenient: digits once `-` and `.` are removed.
pub fn is_numeric(value: &str, mode: NumericMode) -> bool {
    match mode {
        NumericMode::Strict => DIGITS.is_match(value),
        NumericMode::Lenient => {
            let stripped: String = value.chars().filter(|c| *c != '-' && *c != '.').collect();
            DIGITS.is_match(&stripped)
        }
    }
}

/// Optional leading `-`, optional single `.`; zoned `{`/`}` overpunch markers are ignored
pub fn is_signed_decimal(value: &str) -> bool {
    if value.contains(['{', '}']) {
        let unzoned: String = value.chars().filter(|c| *c != '{' && *c != '}').collect();
        SIGNED_DECIMAL.is_match(&unzoned)
    } else {
        SIGNED_DECIMAL.is_match(value)
    }
}

pub fn matches_date(value: &str, format: DateFormat) -> bool {
    match format {
        DateFormat::Ccyymmdd => CCYYMMDD.is_match(value),
        DateFormat::Hhmmss => HHMMSS.is_match(value),
        DateFormat::MmDdYyyy => MM_DD_YYYY.is_match(value),
    }
}

/// A CCYYMMDD date written the way a column of `format` carries it
///
/// Time-of-day columns have no date to compare and yield `None`.
pub fn format_date(date: &str, format: DateFormat) -> Option<String> {
    if !CCYYMMDD.is_match(date) {
        return None;
    }
    match format {
        DateFormat::Ccyymmdd => Some(date.to_string()),
        DateFormat::MmDdYyyy => Some(format!("{}-{}-{}", &date[4..6], &date[6..8], &date[..4])),
        DateFormat::Hhmmss => None,
    }
}

/// True when every character is a decimal digit and there is at least one
pub fn is_digits(value: &str) -> bool {
    DIGITS.is_match(value)
}
