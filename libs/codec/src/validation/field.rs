//! # Field Validator
//!
//! Walks every field of one record layout over one line, in layout order, and
//! reports each violated constraint. Checks are independent: a field that is
//! both truncated and non-numeric yields two diagnostics.
//!
//! ## Per-field checks
//!
//! ```text
//! slice(range) ─► length (unless the line ends before the field)
//!      │
//!      └─ trim ─► empty? stop
//!                   └─► type ─► date/time format ─► allowed values
//! ```
//!
//! The client account overlay runs after the field walk on detail records.

use rxfeed_types::{AccountMatch, ClientRules, FieldSpec, LayoutFamily, RecordLayout};

use crate::decode::char_len;
use crate::diagnostic::Diagnostic;
use crate::validation::content::{check_value, Violation};

/// Validate every field of `record` against `line`
pub fn validate_fields(
    line_no: usize,
    line: &str,
    record: &RecordLayout,
    out: &mut Vec<Diagnostic>,
) {
    let width = char_len(line);
    for field in &record.fields {
        validate_field(line_no, line, width, field, out);
    }
}

fn validate_field(
    line_no: usize,
    line: &str,
    width: usize,
    field: &FieldSpec,
    out: &mut Vec<Diagnostic>,
) {
    let range = field.range;
    let raw = range.slice(line);

    // Fields past the end of the line are not reported; truncation inside one is
    if !range.is_beyond(width) {
        let actual = char_len(raw);
        if actual != field.length() {
            out.push(Diagnostic::FieldLength {
                line: line_no,
                field: field.name.clone(),
                actual,
                expected: field.length(),
                range,
            });
        }
    }

    let value = raw.trim();
    for violation in check_value(&field.rules, value) {
        let diagnostic = match violation {
            Violation::NotNumeric => Diagnostic::NotNumeric {
                line: line_no,
                field: field.name.clone(),
                raw: raw.to_string(),
                range,
            },
            Violation::NotSignedNumeric => Diagnostic::NotSignedNumeric {
                line: line_no,
                field: field.name.clone(),
                raw: raw.to_string(),
                range,
            },
            Violation::BadDateTime(format) => Diagnostic::BadDateTime {
                line: line_no,
                field: field.name.clone(),
                raw: raw.to_string(),
                format,
                range,
            },
            Violation::NotAllowed => Diagnostic::NotAllowed {
                line: line_no,
                field: field.name.clone(),
                raw: raw.to_string(),
                allowed: field.rules.valid_values.clone(),
                range,
            },
        };
        out.push(diagnostic);
    }
}

/// Client account-code overlay for one detail line
///
/// The layout's own `account_match` wins; otherwise the client rule decides
/// (a single literal is a prefix, an allow-list needs an exact member).
pub fn check_account(
    line_no: usize,
    line: &str,
    family: &LayoutFamily,
    client: &ClientRules,
) -> Option<Diagnostic> {
    let prefix = client.account_prefix.as_ref()?;
    let field = family
        .account_field
        .as_deref()
        .and_then(|name| family.detail()?.field(name))?;

    let account = field.range.slice(line).trim();
    match family.account_match {
        Some(AccountMatch::Exact) => {
            if client.account_matches(account, AccountMatch::Exact) {
                None
            } else {
                Some(Diagnostic::AccountExact {
                    line: line_no,
                    field: field.name.clone(),
                    account: account.to_string(),
                    expected: prefix.clone(),
                    range: field.range,
                })
            }
        }
        explicit => {
            let mode = explicit.unwrap_or_else(|| client.default_match());
            if client.account_matches(account, mode) {
                None
            } else {
                Some(Diagnostic::AccountPrefix {
                    line: line_no,
                    account: account.to_string(),
                    prefix: prefix.clone(),
                    range: field.range,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxfeed_types::{FieldRules, LogicalType, NumericMode, RecordType};

    fn record() -> RecordLayout {
        RecordLayout {
            record_type: RecordType::Detail,
            tag: None,
            fields: vec![
                FieldSpec::new(
                    "count",
                    1,
                    4,
                    4,
                    FieldRules::new(LogicalType::Numeric).with_numeric_mode(NumericMode::Strict),
                )
                .unwrap(),
                FieldSpec::new(
                    "flag",
                    5,
                    5,
                    1,
                    FieldRules::new(LogicalType::Alphanumeric).with_valid_values(["Y", "N"]),
                )
                .unwrap(),
                FieldSpec::new("amount", 6, 10, 5, FieldRules::new(LogicalType::SignedDecimal))
                    .unwrap(),
            ],
        }
    }

    fn run(line: &str) -> Vec<String> {
        let mut out = Vec::new();
        validate_fields(7, line, &record(), &mut out);
        out.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_clean_line() {
        assert!(run("0012Y-12.5").is_empty());
        assert!(run("    Y     ").is_empty());
    }

    #[test]
    fn test_each_rule_reports() {
        let errors = run("12AXQ1-2-3");
        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors[0],
            "Line 7, Field count: Expected numeric value, got '12AX' (positions 1-4)."
        );
        assert_eq!(
            errors[1],
            "Line 7, Field flag: Invalid flag value 'Q'. Expected Y or N (positions 5-5)."
        );
        assert_eq!(
            errors[2],
            "Line 7, Field amount: Expected signed numeric value, got '1-2-3' (positions 6-10)."
        );
    }

    #[test]
    fn test_truncation_reported_absence_skipped() {
        let errors = run("0012Y12");
        assert_eq!(
            errors,
            vec!["Line 7, Field amount: Length is 2, expected 5 (positions 6-10)."]
        );
        assert!(run("0012").is_empty());
    }

    #[test]
    fn test_length_and_type_both_reported() {
        let errors = run("1A");
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("Length is 2, expected 4"));
        assert!(errors[1].contains("Expected numeric value, got '1A'"));
    }
}
