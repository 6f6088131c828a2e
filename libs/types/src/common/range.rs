//! # Byte Range Value Type
//!
//! Vendor layout documents give field positions as 1-based inclusive
//! `(from, to)` pairs. [`ByteRange`] stores the 0-based half-open equivalent and
//! is the only place where that conversion happens.
//!
//! Positions count characters of the decoded line. Input is decoded as UTF-8
//! with replacement, so for the ASCII files these layouts describe a position is
//! exactly one byte.

use std::fmt;

use crate::common::errors::LayoutError;

/// A field's location inside a fixed-width record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    start: usize,
    end: usize,
}

impl ByteRange {
    /// Build from 1-based inclusive positions as written in layout documents
    pub fn from_positions(from: usize, to: usize) -> Result<Self, LayoutError> {
        if from == 0 || to < from {
            return Err(LayoutError::InvalidRange {
                field: String::new(),
                from,
                to,
            });
        }
        Ok(Self {
            start: from - 1,
            end: to,
        })
    }

    /// 0-based start offset
    pub fn start(&self) -> usize {
        self.start
    }

    /// 0-based exclusive end offset
    pub fn end(&self) -> usize {
        self.end
    }

    /// 1-based first position
    pub fn from_position(&self) -> usize {
        self.start + 1
    }

    /// 1-based last position (inclusive)
    pub fn to_position(&self) -> usize {
        self.end
    }

    /// Declared width of the field
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// Slice `line` by this range.
    ///
    /// Never panics: a line shorter than `end` yields whatever characters
    /// exist, possibly an empty string.
    pub fn slice<'a>(&self, line: &'a str) -> &'a str {
        let begin = char_offset(line, self.start);
        let finish = char_offset(line, self.end);
        &line[begin..finish]
    }

    /// True when the line ends before this field begins
    pub fn is_beyond(&self, line_chars: usize) -> bool {
        line_chars <= self.start
    }

    /// True when the line ends inside this field
    pub fn is_truncated_by(&self, line_chars: usize) -> bool {
        line_chars > self.start && line_chars < self.end
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.from_position(), self.to_position())
    }
}

/// Byte offset of the `n`th character, clamped to the end of the string
fn char_offset(line: &str, n: usize) -> usize {
    line.char_indices()
        .nth(n)
        .map(|(offset, _)| offset)
        .unwrap_or(line.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_convert_to_zero_based() {
        let range = ByteRange::from_positions(82, 111).unwrap();
        assert_eq!(range.start(), 81);
        assert_eq!(range.end(), 111);
        assert_eq!(range.len(), 30);
        assert_eq!(range.from_position(), 82);
        assert_eq!(range.to_position(), 111);
    }

    #[test]
    fn test_single_position_field() {
        let gender = ByteRange::from_positions(104, 104).unwrap();
        assert_eq!(gender.len(), 1);
        assert_eq!(gender.to_string(), "104-104");
    }

    #[test]
    fn test_invalid_positions_rejected() {
        assert!(ByteRange::from_positions(0, 5).is_err());
        assert!(ByteRange::from_positions(10, 9).is_err());
    }

    #[test]
    fn test_slice_short_line_never_panics() {
        let range = ByteRange::from_positions(3, 6).unwrap();
        assert_eq!(range.slice("1 AB"), "AB");
        assert_eq!(range.slice("1"), "");
        assert_eq!(range.slice(""), "");
        assert_eq!(range.slice("1 ABCDEFG"), "ABCD");
    }

    #[test]
    fn test_slice_counts_characters() {
        let range = ByteRange::from_positions(2, 3).unwrap();
        assert_eq!(range.slice("A\u{FFFD}BC"), "\u{FFFD}B");
    }

    #[test]
    fn test_truncation_and_absence() {
        let range = ByteRange::from_positions(5, 8).unwrap();
        assert!(range.is_beyond(4));
        assert!(!range.is_beyond(5));
        assert!(range.is_truncated_by(6));
        assert!(!range.is_truncated_by(8));
    }
}
