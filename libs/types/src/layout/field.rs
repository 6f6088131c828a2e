//! # Field Definitions
//!
//! One column of a record. Fixed-width layouts use [`FieldSpec`] (name plus a
//! [`ByteRange`]); delimited eligibility layouts use [`ColumnSpec`] (name plus
//! column order). Both carry the same [`FieldRules`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::errors::LayoutError;
use crate::common::range::ByteRange;

/// Logical type of a field's content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalType {
    /// Digits only; strictness decided by [`NumericMode`]
    Numeric,
    /// No content constraint
    Alphanumeric,
    /// Optional leading `-`, optional single `.`; implied scale lives in the comment
    SignedDecimal,
    /// Free-form content such as filler
    Other,
}

impl LogicalType {
    /// Parse a layout-document type tag (`N`, `A/N`, `AN`, `A`, `S9(8)V99`, `other`)
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case("N") {
            Some(Self::Numeric)
        } else if tag.eq_ignore_ascii_case("A/N")
            || tag.eq_ignore_ascii_case("AN")
            || tag.eq_ignore_ascii_case("A")
        {
            Some(Self::Alphanumeric)
        } else if tag.to_ascii_uppercase().starts_with("S9") {
            Some(Self::SignedDecimal)
        } else if tag.eq_ignore_ascii_case("other") || tag.eq_ignore_ascii_case("filler") {
            Some(Self::Other)
        } else {
            None
        }
    }
}

/// How strictly a `Numeric` field is checked
///
/// `Strict` is for pure counts and identifiers (`^\d+$`). `Lenient` is for
/// numeric fields that sit next to signed monetary data and may carry `-` or
/// `.` (content must be digits once those are removed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumericMode {
    #[default]
    Strict,
    Lenient,
}

/// Date/time format of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateFormat {
    /// 8 digits, century-year-month-day
    Ccyymmdd,
    /// 6 digits, hour-minute-second
    Hhmmss,
    /// `MM-DD-YYYY`
    MmDdYyyy,
}

impl DateFormat {
    /// Parse a layout-document format name; `YYYYMMDD` is an alias of `CCYYMMDD`
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "CCYYMMDD" | "YYYYMMDD" => Some(Self::Ccyymmdd),
            "HHMMSS" => Some(Self::Hhmmss),
            "MM-DD-YYYY" => Some(Self::MmDdYyyy),
            _ => None,
        }
    }

    /// Name used in diagnostics
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ccyymmdd => "CCYYMMDD",
            Self::Hhmmss => "HHMMSS",
            Self::MmDdYyyy => "MM-DD-YYYY",
        }
    }

    /// Date formats report "date", HHMMSS reports "time"
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Hhmmss => "time",
            _ => "date",
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Constraints shared by fixed-width fields and delimited columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRules {
    pub logical_type: LogicalType,
    pub numeric_mode: NumericMode,
    /// Closed set of accepted values; empty means unconstrained
    pub valid_values: Vec<String>,
    pub date_format: Option<DateFormat>,
    /// Only meaningful for delimited layouts
    pub required: bool,
    pub comment: Option<String>,
}

impl FieldRules {
    pub fn new(logical_type: LogicalType) -> Self {
        Self {
            logical_type,
            numeric_mode: NumericMode::default(),
            valid_values: Vec::new(),
            date_format: None,
            required: false,
            comment: None,
        }
    }

    pub fn with_numeric_mode(mut self, mode: NumericMode) -> Self {
        self.numeric_mode = mode;
        self
    }

    pub fn with_valid_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_date_format(mut self, format: DateFormat) -> Self {
        self.date_format = Some(format);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn is_filler(&self) -> bool {
        self.logical_type == LogicalType::Other
    }
}

/// One field of a fixed-width record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub range: ByteRange,
    pub rules: FieldRules,
}

impl FieldSpec {
    /// Build a field, enforcing `to - from + 1 == length`
    pub fn new(
        name: impl Into<String>,
        from: usize,
        to: usize,
        length: usize,
        rules: FieldRules,
    ) -> Result<Self, LayoutError> {
        let name = name.into();
        let range = ByteRange::from_positions(from, to).map_err(|_| LayoutError::InvalidRange {
            field: name.clone(),
            from,
            to,
        })?;
        if range.len() != length {
            return Err(LayoutError::LengthMismatch {
                field: name,
                from,
                to,
                declared: length,
                computed: range.len(),
            });
        }
        Ok(Self { name, range, rules })
    }

    pub fn length(&self) -> usize {
        self.range.len()
    }
}

/// One column of a delimited record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub rules: FieldRules,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, rules: FieldRules) -> Self {
        Self {
            name: name.into(),
            rules,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags() {
        assert_eq!(LogicalType::from_tag("N"), Some(LogicalType::Numeric));
        assert_eq!(LogicalType::from_tag("A/N"), Some(LogicalType::Alphanumeric));
        assert_eq!(LogicalType::from_tag("S9(8)V99"), Some(LogicalType::SignedDecimal));
        assert_eq!(LogicalType::from_tag("S9(5)V9999"), Some(LogicalType::SignedDecimal));
        assert_eq!(LogicalType::from_tag("other"), Some(LogicalType::Other));
        assert_eq!(LogicalType::from_tag("X(10)"), None);
    }

    #[test]
    fn test_date_format_aliases() {
        assert_eq!(DateFormat::from_name("yyyymmdd"), Some(DateFormat::Ccyymmdd));
        assert_eq!(DateFormat::from_name("HHMMSS").map(|f| f.kind()), Some("time"));
        assert_eq!(DateFormat::MmDdYyyy.to_string(), "MM-DD-YYYY");
        assert_eq!(DateFormat::from_name("DD/MM/YY"), None);
    }

    #[test]
    fn test_field_length_invariant() {
        let rules = FieldRules::new(LogicalType::Alphanumeric);
        let field = FieldSpec::new("member_id", 3, 17, 15, rules.clone()).unwrap();
        assert_eq!(field.length(), 15);

        let err = FieldSpec::new("member_id", 3, 17, 16, rules).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::LengthMismatch { declared: 16, computed: 15, .. }
        ));
        assert!(err.to_string().contains("member_id"));
    }
}
