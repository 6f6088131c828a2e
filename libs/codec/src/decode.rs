//! Byte content to lines.
//!
//! Invalid UTF-8 becomes U+FFFD instead of failing. Lines split on `\r\n`,
//! `\n` or `\r`; a trailing terminator does not produce an extra empty line.

/// Decode raw file content into owned lines
pub fn decode_lines(content: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(content);
    split_lines(&text).into_iter().map(str::to_owned).collect()
}

/// Split on any line terminator
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Line width in characters, the unit layout positions count in
pub fn char_len(line: &str) -> usize {
    line.chars().count()
}
