//! Component K: the Woof escape translator.
//!
//! A Woof table (spec 4.K, 6) declares one escape-lead character and a finite
//! `key -> value` mapping where keys are visible ASCII and values are arbitrary
//! codepoint sequences. [`WoofTable::translate`] scans a content word for the
//! escape lead and replaces each occurrence with the longest key that matches
//! the text immediately following it — "longest" only matters as a tie-break
//! rule in principle, since the load-time prefix-freedom check (spec 3's
//! invariant "no key is a proper prefix of another") guarantees at most one
//! key can ever match at a given position.

use crate::error::{WeftError, WeftResult};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};

/// A loaded Woof escape table.
pub struct WoofTable {
    escape_lead: char,
    entries: HashMap<String, String>,
    max_key_len: usize,
}

impl WoofTable {
    /// Parse a Woof table file (spec 4.K, 6). The first non-blank,
    /// non-comment line is the header and names the escape lead; `H` in that
    /// position stands in for `#` (a literal `#` there would be eaten by
    /// comment-stripping, since `#` at line start always starts a comment).
    /// Every subsequent non-blank, non-comment line is a record
    /// `hex(,hex)*:ASCII+`. Fails with [`WeftError::WoofAmbiguous`] if any
    /// key is a proper prefix of another.
    pub fn load<R: Read>(input: R) -> WeftResult<Self> {
        let mut lines = BufReader::new(input).lines();
        let mut header = None;
        let mut entries: HashMap<String, String> = HashMap::new();

        while let Some(line) = lines.next() {
            let line = line.map_err(|e| WeftError::Io(e.to_string()))?;
            let stripped = strip_comment(&line).trim();
            if stripped.is_empty() {
                continue;
            }
            header = Some(parse_header(stripped)?);
            break;
        }
        let escape_lead = header.ok_or_else(|| {
            WeftError::WoofSyntax("table file has no header declaring an escape lead".to_string())
        })?;

        for line in lines {
            let line = line.map_err(|e| WeftError::Io(e.to_string()))?;
            let stripped = strip_comment(&line).trim();
            if stripped.is_empty() {
                continue;
            }
            let (key, value) = parse_record(stripped)?;
            if entries.contains_key(&key) {
                return Err(WeftError::WoofSyntax(format!(
                    "duplicate woof table key {key:?}"
                )));
            }
            entries.insert(key, value);
        }

        check_prefix_free(&entries)?;
        let max_key_len = entries.keys().map(|k| k.chars().count()).max().unwrap_or(0);

        Ok(Self {
            escape_lead,
            entries,
            max_key_len,
        })
    }

    /// Apply this table to one content word: pass text through until the
    /// escape lead is seen, then consume the longest matching key and emit
    /// its value. Fails with [`WeftError::WoofSyntax`] if an escape lead is
    /// not followed by any known key.
    pub fn translate(&self, word: &str) -> WeftResult<String> {
        let chars: Vec<char> = word.chars().collect();
        let mut out = String::new();
        let mut i = 0;
        while i < chars.len() {
            if chars[i] != self.escape_lead {
                out.push(chars[i]);
                i += 1;
                continue;
            }
            let remaining = chars.len() - (i + 1);
            let bound = self.max_key_len.min(remaining);
            let mut matched = None;
            for len in (1..=bound).rev() {
                let candidate: String = chars[i + 1..i + 1 + len].iter().collect();
                if let Some(value) = self.entries.get(&candidate) {
                    matched = Some((len, value));
                    break;
                }
            }
            match matched {
                Some((len, value)) => {
                    out.push_str(value);
                    i += 1 + len;
                }
                None => {
                    return Err(WeftError::WoofSyntax(format!(
                        "escape lead {:?} at position {i} matched no table key",
                        self.escape_lead
                    )))
                }
            }
        }
        Ok(out)
    }
}

fn parse_header(line: &str) -> WeftResult<char> {
    let mut chars = line.chars();
    let c = chars
        .next()
        .ok_or_else(|| WeftError::WoofSyntax("empty header line".to_string()))?;
    if chars.next().is_some() {
        return Err(WeftError::WoofSyntax(format!(
            "header line must be a single character, got {line:?}"
        )));
    }
    let lead = if c == 'H' { '#' } else { c };
    if !lead.is_ascii_graphic() || lead.is_ascii_alphanumeric() {
        return Err(WeftError::WoofSyntax(format!(
            "escape lead {lead:?} must be a printable ASCII non-alphanumeric character"
        )));
    }
    Ok(lead)
}

fn parse_record(line: &str) -> WeftResult<(String, String)> {
    let (hex_part, ascii_part) = line.split_once(':').ok_or_else(|| {
        WeftError::WoofSyntax(format!("record {line:?} is missing the ':' separator"))
    })?;
    if ascii_part.is_empty() || !ascii_part.chars().all(|c| c.is_ascii_graphic()) {
        return Err(WeftError::WoofSyntax(format!(
            "record key {ascii_part:?} must be non-empty visible ASCII"
        )));
    }
    let mut value = String::new();
    for hex in hex_part.split(',') {
        let cp = u32::from_str_radix(hex, 16).map_err(|_| {
            WeftError::WoofSyntax(format!("invalid hex codepoint {hex:?} in record {line:?}"))
        })?;
        let c = char::from_u32(cp).ok_or_else(|| {
            WeftError::WoofSyntax(format!("record {line:?} names an invalid codepoint {cp:x}"))
        })?;
        value.push(c);
    }
    if value.is_empty() {
        return Err(WeftError::WoofSyntax(format!(
            "record {line:?} has an empty value"
        )));
    }
    Ok((ascii_part.to_string(), value))
}

fn check_prefix_free(entries: &HashMap<String, String>) -> WeftResult<()> {
    let mut keys: Vec<&String> = entries.keys().collect();
    keys.sort();
    for pair in keys.windows(2) {
        if pair[1].starts_with(pair[0].as_str()) {
            return Err(WeftError::WoofAmbiguous(pair[0].clone(), pair[1].clone()));
        }
    }
    Ok(())
}

/// Strip a trailing comment: `#` only introduces one when it is the first
/// character of the line or is preceded by whitespace.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut prev_is_space = true;
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'#' && prev_is_space {
            return &line[..i];
        }
        prev_is_space = b == b' ' || b == b'\t';
    }
    line
}
