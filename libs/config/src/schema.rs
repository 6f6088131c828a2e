//! # Layout Document Schema
//!
//! Raw serde shapes of the TOML layout documents and their conversion into
//! the validated model in `rxfeed_types`. Every structural invariant a layout
//! must satisfy is checked here, once, when the document is loaded.
//!
//! ```toml
//! name = "umr_accumulator"
//! version = 3
//! format = "fixed"
//! record_length = 500
//! tag = { from = 1, to = 2 }
//!
//! [[records]]
//! type = "header"
//! tag = "1"
//! fields = [
//!     { name = "record_type", type = "A/N", from = 1, to = 2, length = 2 },
//! ]
//! ```

use std::collections::{BTreeMap, HashSet};

use rxfeed_types::{
    AccountMatch, ByteRange, ColumnSpec, DateFormat, EdiRules, EligibilityLayout, FieldRules,
    FieldSpec, FilenameToken, Layout, LayoutError, LayoutFamily, LogicalType, NumericMode,
    RecordLayout, RecordType,
};
use serde::Deserialize;

use crate::error::RegistryError;

/// Physical shape of a layout document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutFormat {
    Fixed,
    Delimited,
}

/// 1-based inclusive position pair
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PositionDef {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilenameTokenDef {
    pub field: String,
    pub prefix: String,
}

/// One field line of a fixed-width record
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: String,
    pub from: usize,
    pub to: usize,
    pub length: usize,
    pub numeric: Option<NumericMode>,
    #[serde(default)]
    pub valid_values: Vec<String>,
    pub date_format: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordDef {
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub tag: Option<String>,
    pub fields: Vec<FieldDef>,
}

/// One column of a delimited layout
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(default)]
    pub required: bool,
    pub numeric: Option<NumericMode>,
    #[serde(default)]
    pub valid_values: Vec<String>,
    pub date_format: Option<String>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdiDef {
    pub required_segments: Vec<String>,
}

/// A complete layout document
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutFile {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: u32,
    pub format: LayoutFormat,
    /// Default numeric strictness for `N` fields without their own override
    #[serde(default)]
    pub numeric: NumericMode,

    // Fixed-width
    pub record_length: Option<usize>,
    #[serde(default)]
    pub enforce_record_length: bool,
    pub tag: Option<PositionDef>,
    pub account_field: Option<String>,
    pub account_match: Option<AccountMatch>,
    pub control_count_field: Option<String>,
    pub filename_token: Option<FilenameTokenDef>,
    #[serde(default)]
    pub records: Vec<RecordDef>,

    // Delimited
    pub delimiter: Option<String>,
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
    pub edi: Option<EdiDef>,
}

fn default_version() -> u32 {
    1
}

/// Client rules plus category bindings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientDef {
    pub account_prefix: Option<String>,
    pub eligibility_filename_pattern: Option<String>,
    /// Category name to layout name
    #[serde(default)]
    pub layouts: BTreeMap<String, String>,
}

/// The `clients.toml` document
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientsFile {
    #[serde(default)]
    pub clients: BTreeMap<String, ClientDef>,
}

impl ClientsFile {
    pub fn from_toml(origin: &str, toml_str: &str) -> Result<Self, RegistryError> {
        toml::from_str(toml_str).map_err(|e| RegistryError::Parse {
            origin: origin.to_string(),
            message: e.to_string(),
        })
    }
}

impl LayoutFile {
    pub fn from_toml(origin: &str, toml_str: &str) -> Result<Self, RegistryError> {
        toml::from_str(toml_str).map_err(|e| RegistryError::Parse {
            origin: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Check every invariant and build the runtime layout
    pub fn into_layout(self) -> Result<Layout, RegistryError> {
        match self.format {
            LayoutFormat::Fixed => self.into_family().map(Layout::FixedWidth),
            LayoutFormat::Delimited => self.into_eligibility().map(Layout::Eligibility),
        }
    }

    fn invalid(&self, reason: impl Into<String>) -> RegistryError {
        RegistryError::Invalid {
            layout: self.name.clone(),
            reason: reason.into(),
        }
    }

    fn into_family(self) -> Result<LayoutFamily, RegistryError> {
        if !self.columns.is_empty() || self.delimiter.is_some() || self.edi.is_some() {
            return Err(self.invalid(
                "fixed-width layouts cannot declare columns, delimiter or edi",
            ));
        }
        if self.records.is_empty() {
            return Err(self.invalid("no records declared"));
        }
        if self.enforce_record_length && self.record_length.is_none() {
            return Err(self.invalid("enforce_record_length requires record_length"));
        }

        let tag_range = match self.tag {
            Some(pos) => Some(
                ByteRange::from_positions(pos.from, pos.to)
                    .map_err(|_| {
                        self.invalid(format!("invalid tag range {}-{}", pos.from, pos.to))
                    })?,
            ),
            None => None,
        };

        let mut seen_types = HashSet::new();
        let mut seen_tags = HashSet::new();
        let mut records = Vec::with_capacity(self.records.len());
        for record in &self.records {
            if !seen_types.insert(record.record_type) {
                return Err(self.invalid(format!("{} record declared twice", record.record_type)));
            }
            match (&tag_range, &record.tag) {
                (Some(range), Some(tag)) => {
                    if tag.chars().count() > range.len() {
                        return Err(self.invalid(format!(
                            "tag '{}' is wider than tag range {}",
                            tag, range
                        )));
                    }
                    if !seen_tags.insert(tag.clone()) {
                        return Err(self.invalid(format!(
                            "tag '{}' used by more than one record",
                            tag
                        )));
                    }
                }
                (Some(_), None) => {
                    return Err(self.invalid(format!("{} record has no tag", record.record_type)));
                }
                (None, Some(_)) => {
                    return Err(self.invalid("record tag declared without a tag range"));
                }
                (None, None) => {
                    if record.record_type != RecordType::Detail {
                        return Err(self.invalid(
                            "untagged layouts may only declare a detail record",
                        ));
                    }
                }
            }
            records.push(self.build_record(record)?);
        }

        if let Some(expected) = self.record_length {
            for record in &records {
                let total = record.total_length();
                if total != expected {
                    return Err(self.invalid(format!(
                        "{} record lengths sum to {}, expected {}",
                        record.record_type, total, expected
                    )));
                }
                if record.width() != expected {
                    return Err(self.invalid(format!(
                        "{} record covers {} positions, expected {}",
                        record.record_type,
                        record.width(),
                        expected
                    )));
                }
            }
        }

        let family = LayoutFamily {
            name: self.name.clone(),
            version: self.version,
            tag_range,
            records,
            record_length: self.record_length,
            enforce_record_length: self.enforce_record_length,
            account_field: self.account_field.clone(),
            account_match: self.account_match,
            control_count_field: self.control_count_field.clone(),
            filename_token: self.filename_token.as_ref().map(|t| FilenameToken {
                field: t.field.clone(),
                prefix: t.prefix.clone(),
            }),
        };

        if family.detail().is_none() {
            return Err(self.invalid("no detail record declared"));
        }
        if let Some(account) = &family.account_field {
            if family.detail().and_then(|d| d.field(account)).is_none() {
                return Err(self.invalid(format!(
                    "account field '{}' not in detail record",
                    account
                )));
            }
        }
        if let Some(count) = &family.control_count_field {
            let found = family
                .layout(RecordType::Trailer)
                .and_then(|t| t.field(count))
                .is_some();
            if !found {
                return Err(self.invalid(format!(
                    "control count field '{}' not in trailer record",
                    count
                )));
            }
        }
        if let Some(token) = &family.filename_token {
            for record_type in [RecordType::Header, RecordType::Trailer] {
                let found = family
                    .layout(record_type)
                    .and_then(|r| r.field(&token.field))
                    .is_some();
                if !found {
                    return Err(self.invalid(format!(
                        "filename field '{}' not in {} record",
                        token.field, record_type
                    )));
                }
            }
        }

        Ok(family)
    }

    fn build_record(&self, record: &RecordDef) -> Result<RecordLayout, RegistryError> {
        let mut names = HashSet::new();
        let mut fields = Vec::with_capacity(record.fields.len());
        for def in &record.fields {
            if !names.insert(def.name.as_str()) {
                return Err(self.invalid(format!(
                    "field '{}' declared twice in {} record",
                    def.name, record.record_type
                )));
            }
            let rules = self.build_rules(
                &def.name,
                &def.type_tag,
                def.numeric,
                &def.valid_values,
                def.date_format.as_deref(),
                def.comment.as_deref(),
            )?;
            let field = FieldSpec::new(def.name.clone(), def.from, def.to, def.length, rules)
                .map_err(|source| RegistryError::Field {
                    layout: self.name.clone(),
                    source,
                })?;
            fields.push(field);
        }
        Ok(RecordLayout {
            record_type: record.record_type,
            tag: record.tag.clone(),
            fields,
        })
    }

    fn build_rules(
        &self,
        field: &str,
        type_tag: &str,
        numeric: Option<NumericMode>,
        valid_values: &[String],
        date_format: Option<&str>,
        comment: Option<&str>,
    ) -> Result<FieldRules, RegistryError> {
        let field_error = |source| RegistryError::Field {
            layout: self.name.clone(),
            source,
        };
        let logical_type = LogicalType::from_tag(type_tag).ok_or_else(|| {
            field_error(LayoutError::UnknownType {
                field: field.to_string(),
                tag: type_tag.to_string(),
            })
        })?;
        let mut rules = FieldRules::new(logical_type)
            .with_numeric_mode(numeric.unwrap_or(self.numeric))
            .with_valid_values(valid_values.iter().cloned());
        if let Some(name) = date_format {
            let format = DateFormat::from_name(name).ok_or_else(|| {
                field_error(LayoutError::UnknownDateFormat {
                    field: field.to_string(),
                    format: name.to_string(),
                })
            })?;
            rules = rules.with_date_format(format);
        }
        if let Some(comment) = comment {
            rules = rules.with_comment(comment);
        }
        Ok(rules)
    }

    fn into_eligibility(self) -> Result<EligibilityLayout, RegistryError> {
        if !self.records.is_empty() || self.tag.is_some() || self.record_length.is_some() {
            return Err(self.invalid(
                "delimited layouts cannot declare records, tag or record_length",
            ));
        }
        if self.columns.is_empty() {
            return Err(self.invalid("no columns declared"));
        }

        let delimiter = match self.delimiter.as_deref() {
            None => '\t',
            Some(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    _ => {
                        return Err(self.invalid(format!(
                            "delimiter '{}' must be one character",
                            text
                        )))
                    }
                }
            }
        };

        let mut names = HashSet::new();
        let mut columns = Vec::with_capacity(self.columns.len());
        for def in &self.columns {
            if !names.insert(def.name.as_str()) {
                return Err(self.invalid(format!("column '{}' declared twice", def.name)));
            }
            let rules = self
                .build_rules(
                    &def.name,
                    &def.type_tag,
                    def.numeric,
                    &def.valid_values,
                    def.date_format.as_deref(),
                    def.comment.as_deref(),
                )?
                .required(def.required);
            columns.push(ColumnSpec::new(def.name.clone(), rules));
        }

        Ok(EligibilityLayout {
            name: self.name.clone(),
            version: self.version,
            delimiter,
            columns,
            edi: self.edi.as_ref().map(|e| EdiRules {
                required_segments: e.required_segments.clone(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TAGGED: &str = r#"
name = "mini"
version = 2
format = "fixed"
record_length = 6
enforce_record_length = true
numeric = "lenient"
tag = { from = 1, to = 1 }
control_count_field = "count"

[[records]]
type = "header"
tag = "H"
fields = [
    { name = "tag", type = "A/N", from = 1, to = 1, length = 1 },
    { name = "date", type = "A/N", from = 2, to = 6, length = 5 },
]

[[records]]
type = "detail"
tag = "D"
fields = [
    { name = "tag", type = "A/N", from = 1, to = 1, length = 1 },
    { name = "amount", type = "N", from = 2, to = 6, length = 5 },
]

[[records]]
type = "trailer"
tag = "T"
fields = [
    { name = "tag", type = "A/N", from = 1, to = 1, length = 1 },
    { name = "count", type = "N", numeric = "strict", from = 2, to = 6, length = 5 },
]
"#;

    fn parse(text: &str) -> Result<Layout, RegistryError> {
        LayoutFile::from_toml("test.toml", text)?.into_layout()
    }

    #[test]
    fn test_tagged_family_parses() {
        let Layout::FixedWidth(family) = parse(TAGGED).unwrap() else {
            panic!("expected fixed-width layout");
        };
        assert_eq!(family.version, 2);
        assert_eq!(family.records.len(), 3);
        let detail = family.layout_for_tag("D").unwrap();
        assert_eq!(detail.field("amount").unwrap().rules.numeric_mode, NumericMode::Lenient);
        let trailer = family.layout(RecordType::Trailer).unwrap();
        assert_eq!(trailer.field("count").unwrap().rules.numeric_mode, NumericMode::Strict);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let broken = TAGGED.replace(
            "{ name = \"date\", type = \"A/N\", from = 2, to = 6, length = 5 }",
            "{ name = \"date\", type = \"A/N\", from = 2, to = 6, length = 4 }",
        );
        let err = parse(&broken).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Field {
                source: LayoutError::LengthMismatch { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_record_width_must_match_declared_length() {
        let broken = TAGGED.replace("record_length = 6", "record_length = 7");
        let err = parse(&broken).unwrap_err();
        assert!(err.to_string().contains("expected 7"));
    }

    #[test]
    fn test_duplicate_tags_rejected() {
        let broken = TAGGED.replace("tag = \"T\"", "tag = \"D\"");
        assert!(parse(&broken).unwrap_err().to_string().contains("tag 'D'"));
    }

    #[test]
    fn test_missing_control_field_rejected() {
        let broken = TAGGED.replace(
            "control_count_field = \"count\"",
            "control_count_field = \"total\"",
        );
        assert!(parse(&broken).unwrap_err().to_string().contains("total"));
    }

    #[test]
    fn test_unknown_type_tag_rejected() {
        let broken = TAGGED.replace("type = \"N\", from = 2", "type = \"X(5)\", from = 2");
        let err = parse(&broken).unwrap_err();
        assert!(err.to_string().contains("X(5)"));
    }

    #[test]
    fn test_delimited_layout_parses() {
        let text = r#"
name = "elig"
format = "delimited"
delimiter = "\t"
columns = [
    { name = "record_type", type = "A/N", required = true, valid_values = ["D"] },
    { name = "dob", type = "A/N", date_format = "YYYYMMDD" },
]

[edi]
required_segments = ["INS", "NM1"]
"#;
        let Layout::Eligibility(layout) = parse(text).unwrap() else {
            panic!("expected eligibility layout");
        };
        assert_eq!(layout.version, 1);
        assert_eq!(layout.delimiter, '\t');
        assert_eq!(layout.header_names(), vec!["record_type", "dob"]);
        assert!(layout.columns[0].rules.required);
        assert_eq!(layout.columns[1].rules.date_format, Some(DateFormat::Ccyymmdd));
        assert_eq!(layout.edi.unwrap().required_segments.len(), 2);
    }

    #[test]
    fn test_multi_char_delimiter_rejected() {
        let text = r#"
name = "elig"
format = "delimited"
delimiter = "||"
columns = [{ name = "a", type = "A/N" }]
"#;
        assert!(parse(text).is_err());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let text = TAGGED.replace("version = 2", "version = 2\nwidth = 6");
        assert!(matches!(parse(&text), Err(RegistryError::Parse { .. })));
    }
}
