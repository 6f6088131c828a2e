//! Error types for layout definitions
//!
//! These errors describe broken layout *data* (a vendor layout transcribed
//! wrongly), never malformed input files. They surface when the registry
//! loads, so a bad layout fails fast at startup instead of at validation time.

use thiserror::Error;

/// Layout definition errors with the offending field named in every variant
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// Position pair is not a valid 1-based inclusive range
    #[error("Field {field}: invalid positions {from}-{to} (positions are 1-based and from <= to)")]
    InvalidRange {
        field: String,
        from: usize,
        to: usize,
    },

    /// Declared length disagrees with the position pair
    #[error("Field {field}: declared length {declared} but positions {from}-{to} span {computed}")]
    LengthMismatch {
        field: String,
        from: usize,
        to: usize,
        declared: usize,
        computed: usize,
    },

    /// Field type tag is not one of N, A/N, S9..., other
    #[error("Field {field}: unknown field type '{tag}'")]
    UnknownType { field: String, tag: String },

    /// Date/time format is not one of the supported formats
    #[error("Field {field}: unknown date format '{format}'")]
    UnknownDateFormat { field: String, format: String },

    /// File category hint could not be parsed
    #[error("Unknown file category '{0}': expected claims, accumulator, accumulator_10pm or eligibility")]
    UnknownCategory(String),
}
