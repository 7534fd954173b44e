//! Component D: the map record codec.
//!
//! A map record is one of three tagged pairs of non-negative integers: `NL(skip,
//! read)` opens a body line, `W(skip, read)` continues it, and the singleton `EOF`
//! closes the whole map. Grammar (spec 4.D): `op digits+ ',' digits+ [\t ]*` where
//! `op` is `+` (NL), `.` (W) or `$` (EOF). `EOF` requires both integers to be zero.

use crate::error::{WeftError, WeftResult};

/// A single parsed map record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapRecord {
    /// Opens a body line.
    Nl { skip: usize, read: usize },
    /// Continues a body line.
    W { skip: usize, read: usize },
    /// Closes the map. Always the final record of a WEFT's map section.
    Eof,
}

impl MapRecord {
    /// The `skip` field, or 0 for [`MapRecord::Eof`].
    pub fn skip(&self) -> usize {
        match self {
            MapRecord::Nl { skip, .. } | MapRecord::W { skip, .. } => *skip,
            MapRecord::Eof => 0,
        }
    }

    /// The `read` field, or 0 for [`MapRecord::Eof`].
    pub fn read(&self) -> usize {
        match self {
            MapRecord::Nl { read, .. } | MapRecord::W { read, .. } => *read,
            MapRecord::Eof => 0,
        }
    }

    /// True for the record that closes a body line (`read == 0`), which is
    /// also true, vacuously, of [`MapRecord::Eof`].
    pub fn is_terminal(&self) -> bool {
        self.read() == 0
    }

    /// Parse one map-record line (trailing SP/HT already stripped or not —
    /// both are tolerated per the grammar).
    pub fn parse(line: &str) -> WeftResult<MapRecord> {
        let line = line.trim_end_matches([' ', '\t']);
        let mut chars = line.chars();
        let op = chars
            .next()
            .ok_or_else(|| WeftError::MapSyntax("empty map record".to_string()))?;
        let rest = chars.as_str();
        let (skip_str, read_str) = split_on_comma(rest)
            .ok_or_else(|| WeftError::MapSyntax(format!("missing comma in {line:?}")))?;
        let skip = parse_digits(skip_str, line)?;
        let read = parse_digits(read_str, line)?;
        match op {
            '+' => Ok(MapRecord::Nl { skip, read }),
            '.' => Ok(MapRecord::W { skip, read }),
            '$' => {
                if skip != 0 || read != 0 {
                    return Err(WeftError::MapSyntax(format!(
                        "EOF record must be all-zero, got {line:?}"
                    )));
                }
                Ok(MapRecord::Eof)
            }
            other => Err(WeftError::MapSyntax(format!(
                "unrecognized map record op {other:?} in {line:?}"
            ))),
        }
    }

    /// Render this record back to its one-line textual form (no trailing
    /// whitespace, terminated by the caller).
    pub fn to_line(&self) -> String {
        match self {
            MapRecord::Nl { skip, read } => format!("+{skip},{read}"),
            MapRecord::W { skip, read } => format!(".{skip},{read}"),
            MapRecord::Eof => "$0,0".to_string(),
        }
    }
}

fn split_on_comma(s: &str) -> Option<(&str, &str)> {
    let idx = s.find(',')?;
    Some((&s[..idx], &s[idx + 1..]))
}

fn parse_digits(s: &str, whole_line: &str) -> WeftResult<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(WeftError::MapSyntax(format!(
            "expected decimal digits, got {s:?} in {whole_line:?}"
        )));
    }
    s.parse::<usize>()
        .map_err(|_| WeftError::MapSyntax(format!("integer overflow in {whole_line:?}")))
}
