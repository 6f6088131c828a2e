//! # Diagnostics
//!
//! Every problem the engine finds in a file is one [`Diagnostic`]. Its
//! `Display` output is the complete sentence stored in
//! `ValidationResult::errors`: line number (1-based), field name, expected vs
//! actual, and positions, ready to show an operator as-is.
//!
//! Correction notes are diagnostics too, so they render with the same
//! conventions as validation findings.

use rxfeed_types::{ByteRange, DateFormat, RecordType};
use thiserror::Error;

use crate::classifier::ClassificationError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    // File level
    #[error("File is empty.")]
    EmptyFile,

    #[error("File must contain at least a header and trailer record.")]
    MissingHeaderTrailer,

    #[error("First line must be a header record (record type {tag}).")]
    HeaderNotFirst { tag: String },

    #[error("Last line must be a trailer record (record type {tag}).")]
    TrailerNotLast { tag: String },

    #[error("Trailer record count ({declared}) does not match actual detail record count ({actual}).")]
    ControlCountMismatch { declared: u64, actual: usize },

    #[error("Line {line} ({record_type}): Filename '{value}' does not start with '{prefix}'.")]
    FilenamePrefix {
        line: usize,
        record_type: RecordType,
        value: String,
        prefix: String,
    },

    #[error("Line {line} ({record_type}): Filename '{value}' does not match expected pattern '{expected}'.")]
    FilenameMismatch {
        line: usize,
        record_type: RecordType,
        value: String,
        expected: String,
    },

    // Line level
    #[error("Line {line}: {error}")]
    Unclassified {
        line: usize,
        error: ClassificationError,
    },

    #[error("Line {line}: Line length is {actual}, expected {expected}.")]
    LineLength {
        line: usize,
        actual: usize,
        expected: usize,
    },

    #[error("Line {line}: Account code '{account}' does not start with expected prefix '{prefix}' (positions {range}).")]
    AccountPrefix {
        line: usize,
        account: String,
        prefix: String,
        range: ByteRange,
    },

    #[error("Line {line}, Field {field}: Expected account code '{expected}', got '{account}' (positions {range}).")]
    AccountExact {
        line: usize,
        field: String,
        account: String,
        expected: String,
        range: ByteRange,
    },

    // Fixed-width fields
    #[error("Line {line}, Field {field}: Length is {actual}, expected {expected} (positions {range}).")]
    FieldLength {
        line: usize,
        field: String,
        actual: usize,
        expected: usize,
        range: ByteRange,
    },

    #[error("Line {line}, Field {field}: Expected numeric value, got '{raw}' (positions {range}).")]
    NotNumeric {
        line: usize,
        field: String,
        raw: String,
        range: ByteRange,
    },

    #[error("Line {line}, Field {field}: Expected signed numeric value, got '{raw}' (positions {range}).")]
    NotSignedNumeric {
        line: usize,
        field: String,
        raw: String,
        range: ByteRange,
    },

    #[error("Line {line}, Field {field}: Invalid {kind} format '{raw}'. Expected {format} (positions {range}).", kind = .format.kind())]
    BadDateTime {
        line: usize,
        field: String,
        raw: String,
        format: DateFormat,
        range: ByteRange,
    },

    #[error("Line {line}, Field {field}: Invalid {field} value '{raw}'. Expected {choices} (positions {range}).", choices = join_choices(.allowed))]
    NotAllowed {
        line: usize,
        field: String,
        raw: String,
        allowed: Vec<String>,
        range: ByteRange,
    },

    // Delimited columns
    #[error("Line 1: Header mismatch. Expected: [{expected}], Got: [{got}].", expected = .expected.join(", "), got = .got.join(", "))]
    HeaderMismatch { expected: Vec<String>, got: Vec<String> },

    #[error("Line {line}: Expected {expected} columns, got {actual}.")]
    ColumnCount {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Line {line}: {field} is empty but required.")]
    RequiredEmpty { line: usize, field: String },

    #[error("Line {line}, Field {field}: Expected numeric value, got '{value}'.")]
    ColumnNotNumeric {
        line: usize,
        field: String,
        value: String,
    },

    #[error("Line {line}, Field {field}: Expected signed numeric value, got '{value}'.")]
    ColumnNotSignedNumeric {
        line: usize,
        field: String,
        value: String,
    },

    #[error("Line {line}, Field {field}: Invalid {kind} format '{value}'. Expected {format}.", kind = .format.kind())]
    ColumnBadDateTime {
        line: usize,
        field: String,
        value: String,
        format: DateFormat,
    },

    #[error("Line {line}, Field {field}: Invalid {field} value '{value}'. Expected {choices}.", choices = join_choices(.allowed))]
    ColumnNotAllowed {
        line: usize,
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("Line {line}, Field {field}: Date '{value}' does not match selected date '{expected}'.")]
    DateMismatch {
        line: usize,
        field: String,
        value: String,
        expected: String,
    },

    // EDI 834
    #[error("No EDI 834 validation rules defined for {layout}.")]
    EdiUnsupported { layout: String },

    #[error("No INS segments found in EDI 834 file.")]
    NoMembers,

    #[error("Member {member}: Missing required segment {segment}.")]
    MissingSegment { member: usize, segment: String },

    #[error("Member {member}: Invalid member ID '{id}' in NM1 segment.")]
    InvalidMemberId { member: usize, id: String },

    #[error("Member {member}: Missing or invalid NM1*IL segment.")]
    MissingMemberName { member: usize },

    #[error("Member {member}: Invalid date format '{value}' in DTP*348 segment. Expected YYYYMMDD.")]
    InvalidCoverageDate { member: usize, value: String },

    #[error("Member {member}: Missing DTP*348 segment for benefit begin date.")]
    MissingCoverageDate { member: usize },

    #[error("Line 1: Line too short to contain ISA date (positions 71-76).")]
    IsaTooShort,

    #[error("Line 1: Invalid ISA date format '{value}' (positions 71-76). Expected YYMMDD.")]
    IsaDateFormat { value: String },

    #[error("Line 1: ISA date '{full}' (from {raw}) does not match expected date '{expected}'.")]
    IsaDateMismatch {
        full: String,
        raw: String,
        expected: String,
    },

    // Correction notes
    #[error("Line {line}, Field {field}: Replaced special characters ('-', '_', '+') with '0' (positions {range}).")]
    SpecialCharsReplaced {
        line: usize,
        field: String,
        range: ByteRange,
    },

    #[error("Line {line}: Line length is {actual}, padded with spaces to {expected}.")]
    LinePadded {
        line: usize,
        actual: usize,
        expected: usize,
    },

    #[error("Line {line}: Line length is {actual}, truncated to {expected}.")]
    LineTruncated {
        line: usize,
        actual: usize,
        expected: usize,
    },
}

/// Render diagnostics into the string list stored in results
pub fn render(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics.iter().map(ToString::to_string).collect()
}

/// `Y or N`, `M, F, or U`
pub fn join_choices(values: &[String]) -> String {
    match values.len() {
        0 => String::new(),
        1 => values[0].clone(),
        2 => format!("{} or {}", values[0], values[1]),
        n => format!("{}, or {}", values[..n - 1].join(", "), values[n - 1]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(from: usize, to: usize) -> ByteRange {
        ByteRange::from_positions(from, to).unwrap()
    }

    #[test]
    fn test_choice_lists() {
        let yn = vec!["Y".to_string(), "N".to_string()];
        assert_eq!(join_choices(&yn), "Y or N");
        let gender: Vec<String> = ["M", "F", "U"].iter().map(|s| s.to_string()).collect();
        assert_eq!(join_choices(&gender), "M, F, or U");
        assert_eq!(join_choices(&["TRX".to_string()]), "TRX");
    }

    #[test]
    fn test_field_length_message() {
        let d = Diagnostic::FieldLength {
            line: 3,
            field: "member_id".to_string(),
            actual: 10,
            expected: 15,
            range: range(3, 17),
        };
        assert_eq!(
            d.to_string(),
            "Line 3, Field member_id: Length is 10, expected 15 (positions 3-17)."
        );
    }

    #[test]
    fn test_enum_message_names_allowed_set() {
        let d = Diagnostic::NotAllowed {
            line: 2,
            field: "gender".to_string(),
            raw: "X".to_string(),
            allowed: vec!["M".into(), "F".into(), "U".into()],
            range: range(104, 104),
        };
        assert_eq!(
            d.to_string(),
            "Line 2, Field gender: Invalid gender value 'X'. Expected M, F, or U (positions 104-104)."
        );
    }

    #[test]
    fn test_date_and_time_wording() {
        let date = Diagnostic::BadDateTime {
            line: 2,
            field: "birth_date".to_string(),
            raw: "1990-1-1".to_string(),
            format: DateFormat::Ccyymmdd,
            range: range(81, 88),
        };
        assert!(date.to_string().contains("Invalid date format '1990-1-1'. Expected CCYYMMDD"));

        let time = Diagnostic::BadDateTime {
            line: 1,
            field: "process_time".to_string(),
            raw: "12:00".to_string(),
            format: DateFormat::Hhmmss,
            range: range(41, 46),
        };
        assert!(time.to_string().contains("Invalid time format '12:00'. Expected HHMMSS"));
    }

    #[test]
    fn test_control_count_message() {
        let d = Diagnostic::ControlCountMismatch {
            declared: 5,
            actual: 4,
        };
        assert_eq!(
            d.to_string(),
            "Trailer record count (5) does not match actual detail record count (4)."
        );
    }

    #[test]
    fn test_render_keeps_order() {
        let note = Diagnostic::SpecialCharsReplaced {
            line: 2,
            field: "member_id".to_string(),
            range: range(3, 17),
        };
        let rendered = render(&[Diagnostic::EmptyFile, note]);
        assert_eq!(rendered[0], "File is empty.");
        assert!(rendered[1].starts_with("Line 2, Field member_id: Replaced special characters"));
    }
}
