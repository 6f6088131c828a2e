//! Tab-delimited eligibility validation.
//!
//! Row 1 must repeat the layout's column names exactly; a mismatch is reported
//! once and stops the pass, since column positions cannot be trusted after it.
//! Data rows are checked for column count first and skipped when it is wrong.
//! When a selected date is given, well-formed values of date columns must
//! carry it.

use rxfeed_types::EligibilityLayout;

use crate::diagnostic::Diagnostic;
use crate::validation::content::{check_value, format_date, Violation};

pub fn validate_delimited(
    lines: &[String],
    layout: &EligibilityLayout,
    selected_date: Option<&str>,
) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let Some((header, rows)) = lines.split_first() else {
        out.push(Diagnostic::EmptyFile);
        return out;
    };

    let expected = layout.header_names();
    let got: Vec<&str> = header.split(layout.delimiter).collect();
    if got != expected {
        out.push(Diagnostic::HeaderMismatch {
            expected: expected.iter().map(|s| s.to_string()).collect(),
            got: got.iter().map(|s| s.to_string()).collect(),
        });
        return out;
    }

    for (idx, row) in rows.iter().enumerate() {
        let line_no = idx + 2;
        let values: Vec<&str> = row.split(layout.delimiter).collect();
        if values.len() != layout.columns.len() {
            out.push(Diagnostic::ColumnCount {
                line: line_no,
                expected: layout.columns.len(),
                actual: values.len(),
            });
            continue;
        }

        for (column, value) in layout.columns.iter().zip(values) {
            let value = value.trim();
            if value.is_empty() {
                if column.rules.required {
                    out.push(Diagnostic::RequiredEmpty {
                        line: line_no,
                        field: column.name.clone(),
                    });
                }
                continue;
            }

            let violations = check_value(&column.rules, value);
            let well_formed_date = !violations
                .iter()
                .any(|v| matches!(v, Violation::BadDateTime(_)));
            let selected = column
                .rules
                .date_format
                .zip(selected_date)
                .and_then(|(format, date)| format_date(date, format));

            for violation in violations {
                let field = column.name.clone();
                let value = value.to_string();
                out.push(match violation {
                    Violation::NotNumeric => Diagnostic::ColumnNotNumeric {
                        line: line_no,
                        field,
                        value,
                    },
                    Violation::NotSignedNumeric => Diagnostic::ColumnNotSignedNumeric {
                        line: line_no,
                        field,
                        value,
                    },
                    Violation::BadDateTime(format) => Diagnostic::ColumnBadDateTime {
                        line: line_no,
                        field,
                        value,
                        format,
                    },
                    Violation::NotAllowed => Diagnostic::ColumnNotAllowed {
                        line: line_no,
                        field,
                        value,
                        allowed: column.rules.valid_values.clone(),
                    },
                });
            }

            if let Some(expected) = selected.filter(|d| well_formed_date && d.as_str() != value) {
                out.push(Diagnostic::DateMismatch {
                    line: line_no,
                    field: column.name.clone(),
                    value: value.to_string(),
                    expected,
                });
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxfeed_types::{ColumnSpec, DateFormat, FieldRules, LogicalType, NumericMode};

    fn layout() -> EligibilityLayout {
        EligibilityLayout {
            name: "mini_elig".to_string(),
            version: 1,
            delimiter: '\t',
            columns: vec![
                ColumnSpec::new(
                    "record_type",
                    FieldRules::new(LogicalType::Alphanumeric)
                        .with_valid_values(["D"])
                        .required(true),
                ),
                ColumnSpec::new(
                    "member_id",
                    FieldRules::new(LogicalType::Alphanumeric).required(true),
                ),
                ColumnSpec::new(
                    "amount",
                    FieldRules::new(LogicalType::Numeric).with_numeric_mode(NumericMode::Lenient),
                ),
                ColumnSpec::new(
                    "effective_date",
                    FieldRules::new(LogicalType::Alphanumeric)
                        .with_date_format(DateFormat::Ccyymmdd),
                ),
            ],
            edi: None,
        }
    }

    fn lines(rows: &[&str]) -> Vec<String> {
        rows.iter().map(|r| r.to_string()).collect()
    }

    const HEADER: &str = "record_type\tmember_id\tamount\teffective_date";

    #[test]
    fn test_clean_rows() {
        let input = lines(&[HEADER, "D\tM1\t-12.50\t20250101", "D\tM2\t\t"]);
        assert!(validate_delimited(&input, &layout(), None).is_empty());
    }

    #[test]
    fn test_header_mismatch_stops() {
        let input = lines(&["record_type\tmember\tamount\teffective_date", "X\t\t\t"]);
        let errors = validate_delimited(&input, &layout(), None);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().starts_with("Line 1: Header mismatch."));
    }

    #[test]
    fn test_row_findings() {
        let input = lines(&[HEADER, "X\t\t12A\t2025-01-01", "D\tM1"]);
        let errors: Vec<String> = validate_delimited(&input, &layout(), None)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            errors,
            vec![
                "Line 2, Field record_type: Invalid record_type value 'X'. Expected D.",
                "Line 2: member_id is empty but required.",
                "Line 2, Field amount: Expected numeric value, got '12A'.",
                "Line 2, Field effective_date: Invalid date format '2025-01-01'. Expected CCYYMMDD.",
                "Line 3: Expected 4 columns, got 2.",
            ]
        );
    }

    #[test]
    fn test_selected_date_applies_to_date_columns_only() {
        let input = lines(&[
            HEADER,
            "D\tM1\t20250101\t20250101",
            "D\tM2\t1\t20250102",
            "D\tM3\t1\t2025-01-02",
            "D\tM4\t1\t",
        ]);
        assert_eq!(validate_delimited(&input, &layout(), Some("20250102")).len(), 2);

        let errors: Vec<String> = validate_delimited(&input, &layout(), Some("20250101"))
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            errors,
            vec![
                "Line 3, Field effective_date: Date '20250102' does not match selected date '20250101'.",
                "Line 4, Field effective_date: Invalid date format '2025-01-02'. Expected CCYYMMDD.",
            ]
        );
    }
}
