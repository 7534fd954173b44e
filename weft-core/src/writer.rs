//! Component F: the WEFT writer.
//!
//! Accepts per-line tuples from a source or filter via [`WeftWriter::write_line`],
//! buffering map records and body lines on separate temp-file spills (spec 9: "the
//! writer... buffers both streams on disk or in memory"; a spill is cheaper to keep
//! bounded than a growing `String`/`Vec` for arbitrarily long input). `close` then
//! emits the complete file in the fixed order the format requires: signature,
//! declaration, full map (including the closing EOF record), full body.

use crate::error::{WeftError, WeftResult};
use crate::LineTuple;
use std::io::{Read, Seek, SeekFrom, Write};

/// Streaming writer that assembles a complete WEFT container.
pub struct WeftWriter {
    map_spill: std::fs::File,
    body_spill: std::fs::File,
    record_count: usize,
    line_count: usize,
}

impl WeftWriter {
    /// Open a fresh writer, acquiring its two backing spill files.
    pub fn new() -> WeftResult<Self> {
        Ok(Self {
            map_spill: tempfile::tempfile().map_err(|e| WeftError::Io(e.to_string()))?,
            body_spill: tempfile::tempfile().map_err(|e| WeftError::Io(e.to_string()))?,
            record_count: 0,
            line_count: 0,
        })
    }

    /// Write one body line's tuple. `tuple` must have odd length >= 1; its
    /// even-index elements (skips) may be empty, its odd-index elements
    /// (content words) must be non-empty, and no element may contain a CR,
    /// LF, or a lone surrogate (unrepresentable in a Rust `&str` regardless).
    pub fn write_line(&mut self, tuple: &[String]) -> WeftResult<()> {
        validate_tuple(tuple)?;

        let mut body_line = String::new();
        let word_count = (tuple.len() - 1) / 2;

        for i in 0..=word_count {
            let skip = &tuple[2 * i];
            body_line.push_str(skip);
            let read_len = if i < word_count {
                let word = &tuple[2 * i + 1];
                body_line.push_str(word);
                word.chars().count()
            } else {
                0
            };
            let record = if i == 0 {
                crate::map::MapRecord::Nl {
                    skip: skip.chars().count(),
                    read: read_len,
                }
            } else {
                crate::map::MapRecord::W {
                    skip: skip.chars().count(),
                    read: read_len,
                }
            };
            writeln!(self.map_spill, "{}", record.to_line())
                .map_err(|e| WeftError::Io(e.to_string()))?;
            self.record_count += 1;
        }

        writeln!(self.body_spill, "{body_line}").map_err(|e| WeftError::Io(e.to_string()))?;
        self.line_count += 1;
        Ok(())
    }

    /// Finish the container: emit the signature, declaration, full map
    /// (followed by the single closing EOF record), and full body, in that
    /// order, to `out`.
    pub fn close<W: Write>(mut self, mut out: W) -> WeftResult<()> {
        let total_records = self.record_count + 1;
        write!(out, "%WEFT;\n{total_records},{}\n", self.line_count)
            .map_err(|e| WeftError::Io(e.to_string()))?;

        self.map_spill
            .seek(SeekFrom::Start(0))
            .map_err(|e| WeftError::Io(e.to_string()))?;
        copy_all(&mut self.map_spill, &mut out)?;
        writeln!(out, "$0,0").map_err(|e| WeftError::Io(e.to_string()))?;

        self.body_spill
            .seek(SeekFrom::Start(0))
            .map_err(|e| WeftError::Io(e.to_string()))?;
        copy_all(&mut self.body_spill, &mut out)?;

        Ok(())
    }
}

fn copy_all<R: Read, W: Write>(src: &mut R, dst: &mut W) -> WeftResult<()> {
    std::io::copy(src, dst)
        .map(|_| ())
        .map_err(|e| WeftError::Io(e.to_string()))
}

fn validate_tuple(tuple: &[String]) -> WeftResult<()> {
    if tuple.is_empty() || tuple.len() % 2 == 0 {
        return Err(WeftError::Contract(format!(
            "line tuple must have odd length >= 1, got {}",
            tuple.len()
        )));
    }
    for (i, element) in tuple.iter().enumerate() {
        if element.contains('\n') || element.contains('\r') {
            return Err(WeftError::Contract(format!(
                "tuple element {i} contains an embedded line break"
            )));
        }
        let is_word = i % 2 == 1;
        if is_word && element.is_empty() {
            return Err(WeftError::Contract(format!(
                "tuple element {i} is a content word and must not be empty"
            )));
        }
    }
    Ok(())
}
