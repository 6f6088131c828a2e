//! # Record Classifier
//!
//! Decides which sibling layout of a [`LayoutFamily`] governs a line. Tagged
//! families read the record-type tag at the family's shared range, trim it,
//! and look it up among the declared tags. Flat families treat every line as
//! a detail record.

use rxfeed_types::{LayoutFamily, RecordLayout, RecordType};
use thiserror::Error;

use crate::decode::char_len;

/// Why a line could not be assigned a record type
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClassificationError {
    #[error("Line too short to determine record type.")]
    TooShort { needed: usize, actual: usize },

    #[error("Invalid record type '{tag}'. Expected {expected}.")]
    InvalidTag { tag: String, expected: String },
}

/// Record type of `line` within `family`
pub fn classify_record(
    line: &str,
    family: &LayoutFamily,
) -> Result<RecordType, ClassificationError> {
    select_layout(line, family).map(|layout| layout.record_type)
}

/// Layout that governs `line`
pub fn select_layout<'f>(
    line: &str,
    family: &'f LayoutFamily,
) -> Result<&'f RecordLayout, ClassificationError> {
    let Some(range) = family.tag_range else {
        return family.detail().ok_or_else(|| ClassificationError::InvalidTag {
            tag: String::new(),
            expected: family.describe_tags(),
        });
    };

    let actual = char_len(line);
    if actual < range.end() {
        return Err(ClassificationError::TooShort {
            needed: range.end(),
            actual,
        });
    }

    let tag = range.slice(line).trim();
    family
        .layout_for_tag(tag)
        .ok_or_else(|| ClassificationError::InvalidTag {
            tag: tag.to_string(),
            expected: family.describe_tags(),
        })
}
