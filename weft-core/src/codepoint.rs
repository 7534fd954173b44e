//! Component A: codepoint I/O.
//!
//! Reads a UTF-8 byte stream into codepoint (`char`) sequences, stripping a
//! single leading BOM if present, and splits it into [`Line`]s on LF or
//! CRLF. A lone CR not immediately followed by LF is a fatal encoding error.
//! Rust's `char` already excludes surrogates and values above `0x10FFFF`, so
//! once a byte stream is accepted as UTF-8 its codepoints are automatically
//! within the range the spec's `Codepoint` definition requires.

use crate::error::{EncodingError, WeftError, WeftResult};
use std::io::Read;

const BOM: char = '\u{FEFF}';

/// Read an entire stream as UTF-8 text, stripping a single leading BOM.
pub fn read_to_string<R: Read>(mut input: R) -> WeftResult<String> {
    let mut bytes = Vec::new();
    input
        .read_to_end(&mut bytes)
        .map_err(|e| WeftError::Io(e.to_string()))?;
    let text = String::from_utf8(bytes)
        .map_err(|_| WeftError::Encoding(EncodingError::InvalidUtf8))?;
    Ok(strip_bom(&text))
}

/// Strip a single leading `U+FEFF` if present.
pub fn strip_bom(text: &str) -> String {
    match text.strip_prefix(BOM) {
        Some(rest) => rest.to_string(),
        None => text.to_string(),
    }
}

/// Split text into lines on LF or CRLF.
///
/// An empty trailing line is present if and only if `text` ends with a line
/// break, or `text` is empty. A lone CR not immediately followed by LF is
/// rejected as [`EncodingError::StrayCarriageReturn`].
pub fn split_lines(text: &str) -> WeftResult<Vec<String>> {
    if text.is_empty() {
        return Ok(vec![String::new()]);
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\n' => lines.push(std::mem::take(&mut current)),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                    lines.push(std::mem::take(&mut current));
                } else {
                    return Err(WeftError::Encoding(EncodingError::StrayCarriageReturn));
                }
            }
            other => current.push(other),
        }
    }
    lines.push(current);
    Ok(lines)
}

/// Join body lines into a single string, each terminated by LF (never CRLF,
/// never a BOM). This is the canonical WEFT/plain-text output form.
pub fn join_lines<I, S>(lines: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for line in lines {
        out.push_str(line.as_ref());
        out.push('\n');
    }
    out
}
