//! # Record Layouts and Layout Families
//!
//! A [`LayoutFamily`] groups the sibling record layouts of one fixed-width file
//! type. Tagged families (header/detail/trailer) select a sibling by reading a
//! record-type tag at a shared [`ByteRange`]; flat families have a single
//! detail layout used for every line.
//!
//! Delimited eligibility files use [`EligibilityLayout`] instead.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::errors::LayoutError;
use crate::common::range::ByteRange;
use crate::layout::client::AccountMatch;
use crate::layout::field::{ColumnSpec, FieldSpec};

/// Kind of record a line represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Header,
    Detail,
    Trailer,
}

impl RecordType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Header => "Header",
            Self::Detail => "Detail",
            Self::Trailer => "Trailer",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Category hint supplied by the caller alongside the file content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    Claims,
    Accumulator,
    #[serde(rename = "accumulator_10pm")]
    Accumulator10pm,
    Eligibility,
}

impl FileCategory {
    pub const ALL: [FileCategory; 4] = [
        Self::Claims,
        Self::Accumulator,
        Self::Accumulator10pm,
        Self::Eligibility,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Claims => "claims",
            Self::Accumulator => "accumulator",
            Self::Accumulator10pm => "accumulator_10pm",
            Self::Eligibility => "eligibility",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileCategory {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "claims" | "claim" | "txt" => Ok(Self::Claims),
            "accumulator" | "accum" => Ok(Self::Accumulator),
            "accumulator_10pm" | "10pm" | "accum_10pm" => Ok(Self::Accumulator10pm),
            "eligibility" | "elig" => Ok(Self::Eligibility),
            _ => Err(LayoutError::UnknownCategory(s.to_string())),
        }
    }
}

/// One record layout inside a family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLayout {
    pub record_type: RecordType,
    /// Literal tag value selecting this layout (absent for flat families)
    pub tag: Option<String>,
    pub fields: Vec<FieldSpec>,
}

impl RecordLayout {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Sum of declared field lengths
    pub fn total_length(&self) -> usize {
        self.fields.iter().map(FieldSpec::length).sum()
    }

    /// Last position covered by any field
    pub fn width(&self) -> usize {
        self.fields.iter().map(|f| f.range.end()).max().unwrap_or(0)
    }
}

/// Header/trailer payload that must carry a filename token such as `UMR_ACCUM_<date>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameToken {
    /// Field holding the token in both header and trailer layouts
    pub field: String,
    /// Literal prefix; the expected date follows it
    pub prefix: String,
}

impl FilenameToken {
    pub fn expected(&self, date: &str) -> String {
        format!("{}{}", self.prefix, date)
    }
}

/// Sibling fixed-width layouts for one (client, category) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutFamily {
    pub name: String,
    pub version: u32,
    /// Shared location of the record-type tag; `None` for flat families
    pub tag_range: Option<ByteRange>,
    pub records: Vec<RecordLayout>,
    /// Declared fixed record width
    pub record_length: Option<usize>,
    /// Report lines whose width differs from `record_length`
    pub enforce_record_length: bool,
    /// Field re-extracted for the client account-code overlay
    pub account_field: Option<String>,
    /// Overrides the match mode derived from the client's rule
    pub account_match: Option<AccountMatch>,
    /// Trailer field holding the declared detail-record count
    pub control_count_field: Option<String>,
    pub filename_token: Option<FilenameToken>,
}

impl LayoutFamily {
    pub fn is_tagged(&self) -> bool {
        self.tag_range.is_some()
    }

    pub fn layout(&self, record_type: RecordType) -> Option<&RecordLayout> {
        self.records.iter().find(|r| r.record_type == record_type)
    }

    pub fn detail(&self) -> Option<&RecordLayout> {
        self.layout(RecordType::Detail)
    }

    /// Layout whose tag equals `tag`
    pub fn layout_for_tag(&self, tag: &str) -> Option<&RecordLayout> {
        self.records
            .iter()
            .find(|r| r.tag.as_deref() == Some(tag))
    }

    /// True when the family defines both header and trailer records
    pub fn has_header_trailer(&self) -> bool {
        self.layout(RecordType::Header).is_some() && self.layout(RecordType::Trailer).is_some()
    }

    /// Width of a reconstructed detail line
    pub fn detail_width(&self) -> usize {
        self.record_length
            .or_else(|| self.detail().map(RecordLayout::width))
            .unwrap_or(0)
    }

    /// Human-readable list of accepted tags, e.g. `1 (Header), 2 (Detail), or 3 (Trailer)`
    pub fn describe_tags(&self) -> String {
        let tags: Vec<String> = self
            .records
            .iter()
            .filter_map(|r| r.tag.as_ref().map(|t| format!("{} ({})", t, r.record_type)))
            .collect();
        match tags.len() {
            0 => String::new(),
            1 => tags[0].clone(),
            2 => format!("{} or {}", tags[0], tags[1]),
            n => format!("{}, or {}", tags[..n - 1].join(", "), tags[n - 1]),
        }
    }
}

/// EDI 834 rules for eligibility files that arrive as X12 segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdiRules {
    /// Segment ids every member loop must contain
    pub required_segments: Vec<String>,
}

impl Default for EdiRules {
    fn default() -> Self {
        Self {
            required_segments: vec!["INS".to_string(), "NM1".to_string(), "DTP".to_string()],
        }
    }
}

/// Delimited eligibility layout (tab-separated with a header row), plus optional EDI rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityLayout {
    pub name: String,
    pub version: u32,
    pub delimiter: char,
    pub columns: Vec<ColumnSpec>,
    pub edi: Option<EdiRules>,
}

impl EligibilityLayout {
    pub fn header_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// A resolved registry entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    FixedWidth(LayoutFamily),
    Eligibility(EligibilityLayout),
}

impl Layout {
    pub fn name(&self) -> &str {
        match self {
            Self::FixedWidth(family) => &family.name,
            Self::Eligibility(layout) => &layout.name,
        }
    }

    pub fn version(&self) -> u32 {
        match self {
            Self::FixedWidth(family) => family.version,
            Self::Eligibility(layout) => layout.version,
        }
    }
}
