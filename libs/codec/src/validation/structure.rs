//! # File-Level Structural Validator
//!
//! ## Purpose
//!
//! Runs a fixed-width file through classification and field validation line
//! by line, then enforces the invariants that only make sense for the whole
//! file: header first, trailer last, trailer control count, and the filename
//! token carried in header/trailer payloads.
//!
//! ## Architecture Role
//!
//! ```text
//! lines ─► classify ─► width check ─► field rules ─► account overlay
//!            │                                             │
//!            └──────────── per-line outcomes ──────────────┘
//!                                  │
//!                                  ▼
//!          header/trailer placement, control count, filename token
//! ```
//!
//! None of the file-level checks short-circuit the others; every finding is
//! reported.

use rxfeed_types::{ClientRules, LayoutFamily, RecordType};
use tracing::debug;

use crate::classifier::select_layout;
use crate::decode::char_len;
use crate::diagnostic::Diagnostic;
use crate::validation::content::is_digits;
use crate::validation::field::{check_account, validate_fields};

/// Per-line classification outcome, `None` for invalid lines
pub type LineClasses = Vec<Option<RecordType>>;

/// Fixed-width validation context for one file
pub struct StructureValidator<'a> {
    family: &'a LayoutFamily,
    client: Option<&'a ClientRules>,
    expected_date: Option<&'a str>,
}

impl<'a> StructureValidator<'a> {
    pub fn new(family: &'a LayoutFamily) -> Self {
        Self {
            family,
            client: None,
            expected_date: None,
        }
    }

    /// Enable the account overlay with this client's rules
    pub fn with_client(mut self, client: Option<&'a ClientRules>) -> Self {
        self.client = client;
        self
    }

    /// Date the filename token must carry (CCYYMMDD)
    pub fn with_expected_date(mut self, date: Option<&'a str>) -> Self {
        self.expected_date = date;
        self
    }

    /// Validate a non-empty line sequence
    pub fn validate(&self, lines: &[String]) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        let classes = self.validate_lines(lines, &mut out);
        self.validate_structure(lines, &classes, &mut out);
        out
    }

    /// Per-line pass; returns the classification of every line
    pub fn validate_lines(&self, lines: &[String], out: &mut Vec<Diagnostic>) -> LineClasses {
        let mut classes = Vec::with_capacity(lines.len());
        for (idx, line) in lines.iter().enumerate() {
            let line_no = idx + 1;
            let layout = match select_layout(line, self.family) {
                Ok(layout) => layout,
                Err(error) => {
                    out.push(Diagnostic::Unclassified {
                        line: line_no,
                        error,
                    });
                    classes.push(None);
                    continue;
                }
            };
            classes.push(Some(layout.record_type));

            if self.family.enforce_record_length {
                if let Some(expected) = self.family.record_length {
                    let actual = char_len(line);
                    if actual != expected {
                        out.push(Diagnostic::LineLength {
                            line: line_no,
                            actual,
                            expected,
                        });
                        continue;
                    }
                }
            }

            validate_fields(line_no, line, layout, out);

            if layout.record_type == RecordType::Detail {
                if let Some(client) = self.client {
                    if let Some(d) = check_account(line_no, line, self.family, client) {
                        out.push(d);
                    }
                }
            }
        }
        classes
    }

    /// Whole-file checks over the classification outcomes
    pub fn validate_structure(
        &self,
        lines: &[String],
        classes: &LineClasses,
        out: &mut Vec<Diagnostic>,
    ) {
        let detail_count = classes
            .iter()
            .filter(|c| **c == Some(RecordType::Detail))
            .count();
        debug!(
            family = %self.family.name,
            lines = lines.len(),
            details = detail_count,
            "Structural pass"
        );

        if !self.family.has_header_trailer() {
            return;
        }

        if lines.len() < 2 {
            out.push(Diagnostic::MissingHeaderTrailer);
            return;
        }

        let last = lines.len() - 1;
        let header_ok = classes[0] == Some(RecordType::Header);
        let trailer_ok = classes[last] == Some(RecordType::Trailer);

        if !header_ok {
            out.push(Diagnostic::HeaderNotFirst {
                tag: self.tag_of(RecordType::Header),
            });
        }
        if !trailer_ok {
            out.push(Diagnostic::TrailerNotLast {
                tag: self.tag_of(RecordType::Trailer),
            });
        }

        if trailer_ok {
            self.check_control_count(&lines[last], detail_count, out);
        }

        if let (Some(token), Some(date)) = (&self.family.filename_token, self.expected_date) {
            let expected = token.expected(date);
            let ends = [
                (0, header_ok, RecordType::Header),
                (last, trailer_ok, RecordType::Trailer),
            ];
            for (idx, ok, record_type) in ends {
                if !ok {
                    continue;
                }
                let Some(field) = self
                    .family
                    .layout(record_type)
                    .and_then(|r| r.field(&token.field))
                else {
                    continue;
                };
                let value = field.range.slice(&lines[idx]).trim();
                if !value.starts_with(&token.prefix) {
                    out.push(Diagnostic::FilenamePrefix {
                        line: idx + 1,
                        record_type,
                        value: value.to_string(),
                        prefix: token.prefix.clone(),
                    });
                } else if value != expected {
                    out.push(Diagnostic::FilenameMismatch {
                        line: idx + 1,
                        record_type,
                        value: value.to_string(),
                        expected: expected.clone(),
                    });
                }
            }
        }
    }

    fn check_control_count(&self, trailer: &str, detail_count: usize, out: &mut Vec<Diagnostic>) {
        let Some(field) = self
            .family
            .control_count_field
            .as_deref()
            .and_then(|name| self.family.layout(RecordType::Trailer)?.field(name))
        else {
            return;
        };

        // Non-numeric counts are already reported by the field rules
        let raw = field.range.slice(trailer).trim();
        if !is_digits(raw) {
            return;
        }
        if let Ok(declared) = raw.parse::<u64>() {
            if declared != detail_count as u64 {
                out.push(Diagnostic::ControlCountMismatch {
                    declared,
                    actual: detail_count,
                });
            }
        }
    }

    fn tag_of(&self, record_type: RecordType) -> String {
        self.family
            .layout(record_type)
            .and_then(|r| r.tag.clone())
            .unwrap_or_default()
    }
}
