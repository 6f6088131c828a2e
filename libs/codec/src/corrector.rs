//! # Corrector
//!
//! Rewrites known-corrupt characters in detail records. Every `-`, `_` or `+`
//! inside a detail field becomes `'0'`, one character for one character, so
//! field widths never change. Each touched field yields a correction note.
//!
//! Lines of a family with a declared record width are first padded with
//! spaces or truncated to that width (and noted). Header, trailer and
//! unclassifiable lines pass through unchanged.
//!
//! [`correct_lines`] is pure; [`persist_corrected`] is the only side effect.

use std::fs;
use std::path::Path;

use rxfeed_types::{LayoutFamily, RecordType};
use tracing::{debug, info};

use crate::classifier::select_layout;
use crate::diagnostic::Diagnostic;
use crate::error::{EngineError, EngineResult};

/// Characters replaced inside detail fields
pub const SPECIAL_CHARS: [char; 3] = ['-', '_', '+'];

/// Replacement digit
pub const PLACEHOLDER: char = '0';

/// Corrected content plus one note per repair
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Correction {
    pub lines: Vec<String>,
    pub notes: Vec<Diagnostic>,
}

/// Correct every detail line of `lines`
pub fn correct_lines(lines: &[String], family: &LayoutFamily) -> Correction {
    let mut correction = Correction {
        lines: Vec::with_capacity(lines.len()),
        notes: Vec::new(),
    };

    for (idx, line) in lines.iter().enumerate() {
        let line_no = idx + 1;
        match select_layout(line, family) {
            Ok(layout) if layout.record_type == RecordType::Detail => {
                let mut buffer: Vec<char> = line.chars().collect();
                fit_width(line_no, &mut buffer, family.record_length, &mut correction.notes);

                for field in &layout.fields {
                    let end = field.range.end().min(buffer.len());
                    let start = field.range.start().min(end);
                    let slot = &mut buffer[start..end];
                    if !slot.iter().any(|c| SPECIAL_CHARS.contains(c)) {
                        continue;
                    }
                    for c in slot.iter_mut() {
                        if SPECIAL_CHARS.contains(c) {
                            *c = PLACEHOLDER;
                        }
                    }
                    correction.notes.push(Diagnostic::SpecialCharsReplaced {
                        line: line_no,
                        field: field.name.clone(),
                        range: field.range,
                    });
                }

                correction.lines.push(buffer.into_iter().collect());
            }
            _ => correction.lines.push(line.clone()),
        }
    }

    debug!(
        family = %family.name,
        lines = lines.len(),
        notes = correction.notes.len(),
        "Correction pass complete"
    );
    correction
}

fn fit_width(
    line_no: usize,
    buffer: &mut Vec<char>,
    width: Option<usize>,
    notes: &mut Vec<Diagnostic>,
) {
    let Some(expected) = width else {
        return;
    };
    let actual = buffer.len();
    if actual < expected {
        buffer.resize(expected, ' ');
        notes.push(Diagnostic::LinePadded {
            line: line_no,
            actual,
            expected,
        });
    } else if actual > expected {
        buffer.truncate(expected);
        notes.push(Diagnostic::LineTruncated {
            line: line_no,
            actual,
            expected,
        });
    }
}

/// Write corrected lines to `path`, each terminated by `\n`
pub fn persist_corrected(path: &Path, lines: &[String]) -> EngineResult<()> {
    let mut content = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    fs::write(path, content).map_err(|source| EngineError::Persist {
        path: path.to_path_buf(),
        source,
    })?;
    info!("💾 Wrote {} corrected lines to {}", lines.len(), path.display());
    Ok(())
}
