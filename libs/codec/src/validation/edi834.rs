//! # EDI 834 Eligibility Validation
//!
//! Segments end with `~`, elements are separated by `*`. Each member loop
//! starts at an `INS` segment and runs to the next one; envelope segments
//! before the first `INS` (ISA, GS, ST, BGN, ...) belong to no member.
//!
//! Per member:
//! - every required segment id is present
//! - `NM1*IL*1` carries `MI` in element 8 and a word-character member id in element 9
//! - `DTP*348*D8` carries a CCYYMMDD benefit begin date in element 3
//!
//! When the caller supplies an expected date, the interchange date in the ISA
//! segment (positions 71-76, YYMMDD) must match it.

use once_cell::sync::Lazy;
use regex::Regex;
use rxfeed_types::{DateFormat, EdiRules};

use crate::diagnostic::Diagnostic;
use crate::validation::content::{is_digits, matches_date};

static MEMBER_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\w+$").expect("valid regex"));

const SEGMENT_TERMINATOR: char = '~';
const ELEMENT_SEPARATOR: char = '*';

/// True when the first line opens an interchange envelope
pub fn is_edi(lines: &[String]) -> bool {
    lines
        .first()
        .map(|l| l.trim().starts_with("ISA"))
        .unwrap_or(false)
}

/// Validate an EDI 834 document
pub fn validate_edi(
    content: &str,
    first_line: &str,
    rules: &EdiRules,
    expected_date: Option<&str>,
) -> Vec<Diagnostic> {
    let mut out = Vec::new();

    if let Some(expected) = expected_date {
        check_interchange_date(first_line, expected, &mut out);
    }

    let mut members: Vec<Vec<&str>> = Vec::new();
    for segment in content.split(SEGMENT_TERMINATOR) {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        if segment_id(segment) == "INS" {
            members.push(vec![segment]);
        } else if let Some(current) = members.last_mut() {
            current.push(segment);
        }
    }

    if members.is_empty() {
        out.push(Diagnostic::NoMembers);
        return out;
    }

    for (idx, segments) in members.iter().enumerate() {
        validate_member(idx + 1, segments, rules, &mut out);
    }
    out
}

fn segment_id(segment: &str) -> &str {
    segment.split(ELEMENT_SEPARATOR).next().unwrap_or_default()
}

fn validate_member(member: usize, segments: &[&str], rules: &EdiRules, out: &mut Vec<Diagnostic>) {
    for required in &rules.required_segments {
        if !segments.iter().any(|s| segment_id(s) == required) {
            out.push(Diagnostic::MissingSegment {
                member,
                segment: required.clone(),
            });
        }
    }

    // Only the first NM1*IL*1 segment is inspected
    let name = segments.iter().find(|s| s.starts_with("NM1*IL*1"));
    let mut member_id_found = false;
    if let Some(segment) = name {
        let elements: Vec<&str> = segment.split(ELEMENT_SEPARATOR).collect();
        if elements.get(8) == Some(&"MI") {
            let id = elements.get(9).map(|e| e.trim()).unwrap_or_default();
            if !MEMBER_ID.is_match(id) {
                out.push(Diagnostic::InvalidMemberId {
                    member,
                    id: id.to_string(),
                });
            }
            member_id_found = true;
        }
    }
    if !member_id_found {
        out.push(Diagnostic::MissingMemberName { member });
    }

    let coverage = segments.iter().find(|s| s.starts_with("DTP*348*D8"));
    let mut date_found = false;
    if let Some(segment) = coverage {
        let elements: Vec<&str> = segment.split(ELEMENT_SEPARATOR).collect();
        if let Some(value) = elements.get(3) {
            let value = value.trim();
            if !matches_date(value, DateFormat::Ccyymmdd) {
                out.push(Diagnostic::InvalidCoverageDate {
                    member,
                    value: value.to_string(),
                });
            }
            date_found = true;
        }
    }
    if !date_found {
        out.push(Diagnostic::MissingCoverageDate { member });
    }
}

/// Compare the ISA interchange date with `expected` (CCYYMMDD)
///
/// The two-digit year takes century 20 when it is not later than the
/// expected date's year, otherwise 19.
fn check_interchange_date(first_line: &str, expected: &str, out: &mut Vec<Diagnostic>) {
    let line = first_line.trim();
    let chars: Vec<char> = line.chars().collect();
    if chars.len() < 76 {
        out.push(Diagnostic::IsaTooShort);
        return;
    }

    let raw: String = chars[70..76].iter().collect();
    let raw = raw.trim().to_string();
    if raw.chars().count() != 6 || !is_digits(&raw) {
        out.push(Diagnostic::IsaDateFormat { value: raw });
        return;
    }

    let isa_year: u32 = raw.chars().take(2).collect::<String>().parse().unwrap_or(0);
    let expected_year: u32 = expected.get(2..4).and_then(|y| y.parse().ok()).unwrap_or(0);
    let century = if isa_year <= expected_year { "20" } else { "19" };
    let full = format!("{}{}", century, raw);
    if full != expected {
        out.push(Diagnostic::IsaDateMismatch {
            full,
            raw,
            expected: expected.to_string(),
        });
    }
}
