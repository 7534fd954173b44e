//! Component L: the unpack and JSON diagnostic targets.
//!
//! Both targets drain a [`WeftReader`] into a format with no knowledge of the
//! WEFT framing itself: `unpack` reconstitutes the original body text (spec
//! 4.L, "the inverse of a source"), optionally also spilling the embedded
//! map to a side file (`unpack -map`, spec 6); `json` renders the whole
//! container as a single JSON document -- an outer array of inner arrays,
//! each inner array holding one body line's tuple (and, with `include_map`,
//! its raw records) -- for tooling that wants to inspect a WEFT without
//! understanding it.

use weft_core::error::WeftResult;
use weft_core::reader::WeftReader;
use weft_core::LineTuple;
use std::io::{Read, Write};

/// Reconstitute the original body text from a WEFT container.
///
/// `weft_core::codepoint::split_lines` encodes "the source ended with a line
/// break" as a trailing empty line in its output, so its exact inverse joins
/// body lines with `\n` as a *separator* rather than terminating every line
/// with one -- unpack never touches word content either, since a tuple's
/// concatenation *is* the original line by construction (spec 3's line-tuple
/// invariant).
pub fn unpack<R: Read, W: Write>(input: R, output: W) -> WeftResult<()> {
    unpack_with_map(input, output, None::<&mut std::io::Sink>)
}

/// Like [`unpack`], but when `map_out` is given, also writes the embedded
/// map (every NL/W record of every line, plus the closing `$0,0`) to it in
/// its native textual form (spec 6 `unpack -map`).
pub fn unpack_with_map<R: Read, W: Write, M: Write>(
    input: R,
    mut output: W,
    mut map_out: Option<&mut M>,
) -> WeftResult<()> {
    let mut reader = WeftReader::new(input)?;
    let mut lines = Vec::with_capacity(reader.line_count());
    while let Some((tuple, records)) = reader.read_line_with_records()? {
        lines.push(tuple.concat());
        if let Some(map_out) = map_out.as_deref_mut() {
            for rec in &records {
                writeln!(map_out, "{}", rec.to_line())?;
            }
        }
    }
    if let Some(map_out) = map_out.as_deref_mut() {
        writeln!(map_out, "{}", weft_core::MapRecord::Eof.to_line())?;
    }
    output.write_all(lines.join("\n").as_bytes())?;
    Ok(())
}

/// Render a WEFT container as the JSON diagnostic of spec 4.L: a single JSON
/// document, an outer array of inner arrays, each inner array holding one
/// body line's tuple strings in order.
///
/// `include_map` is the supplemented `weft-json --map` affordance
/// (SPEC_FULL's "Supplemented features"): when set, each inner array gets one
/// extra trailing element -- a nested array of that line's raw map records,
/// `{"op": "NL"|"W"|"EOF", "skip": n, "read": n}` (`EOF` has no skip/read
/// fields) -- appended after the tuple strings rather than folded into a
/// differently-shaped wrapper object, so the base "array of arrays of tuple
/// strings" contract still holds when `include_map` is false.
///
/// `pretty` is the second supplemented affordance: `None` packs the whole
/// document onto one line (the default); `Some(width)` breaks every array
/// onto indented lines, `width` spaces per nesting level.
pub fn json<R: Read, W: Write>(
    input: R,
    mut output: W,
    include_map: bool,
    pretty: Option<usize>,
) -> WeftResult<()> {
    let mut reader = WeftReader::new(input)?;
    let mut lines = Vec::with_capacity(reader.line_count());
    while let Some((tuple, records)) = reader.read_line_with_records()? {
        lines.push((tuple, records));
    }

    let mut out = String::new();
    match pretty {
        None => {
            out.push('[');
            for (i, (tuple, records)) in lines.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                push_line_array(&mut out, tuple, records, include_map, None);
            }
            out.push(']');
        }
        Some(width) => {
            out.push_str("[\n");
            for (i, (tuple, records)) in lines.iter().enumerate() {
                if i > 0 {
                    out.push_str(",\n");
                }
                out.push_str(&indent(width, 1));
                push_line_array(&mut out, tuple, records, include_map, Some((width, 1)));
            }
            out.push('\n');
            out.push(']');
        }
    }
    writeln!(output, "{out}")?;
    Ok(())
}

fn push_line_array(
    out: &mut String,
    tuple: &LineTuple,
    records: &[weft_core::MapRecord],
    include_map: bool,
    pretty: Option<(usize, usize)>,
) {
    match pretty {
        None => {
            out.push('[');
            for (i, element) in tuple.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                push_json_string(out, element);
            }
            if include_map {
                out.push_str(",[");
                for (i, rec) in records.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    push_record_json(out, rec, None, 0);
                }
                out.push(']');
            }
            out.push(']');
        }
        Some((width, level)) => {
            out.push_str("[\n");
            for (i, element) in tuple.iter().enumerate() {
                if i > 0 {
                    out.push_str(",\n");
                }
                out.push_str(&indent(width, level + 1));
                push_json_string(out, element);
            }
            if include_map {
                out.push_str(",\n");
                out.push_str(&indent(width, level + 1));
                out.push_str("[\n");
                for (i, rec) in records.iter().enumerate() {
                    if i > 0 {
                        out.push_str(",\n");
                    }
                    out.push_str(&indent(width, level + 2));
                    push_record_json(out, rec, Some(width), level + 2);
                }
                out.push('\n');
                out.push_str(&indent(width, level + 1));
                out.push(']');
            }
            out.push('\n');
            out.push_str(&indent(width, level));
            out.push(']');
        }
    }
}

fn indent(width: usize, level: usize) -> String {
    " ".repeat(width * level)
}

fn push_record_json(
    out: &mut String,
    rec: &weft_core::MapRecord,
    pretty: Option<usize>,
    level: usize,
) {
    use weft_core::MapRecord;
    let (op, skip, read) = match rec {
        MapRecord::Nl { skip, read } => ("NL", Some(*skip), Some(*read)),
        MapRecord::W { skip, read } => ("W", Some(*skip), Some(*read)),
        MapRecord::Eof => ("EOF", None, None),
    };
    match pretty {
        None => match (skip, read) {
            (Some(skip), Some(read)) => {
                out.push_str(&format!("{{\"op\":\"{op}\",\"skip\":{skip},\"read\":{read}}}"))
            }
            _ => out.push_str(&format!("{{\"op\":\"{op}\"}}")),
        },
        Some(width) => {
            let pad = indent(width, level + 1);
            out.push_str("{\n");
            out.push_str(&pad);
            out.push_str(&format!("\"op\": \"{op}\""));
            if let (Some(skip), Some(read)) = (skip, read) {
                out.push_str(&format!(",\n{pad}\"skip\": {skip},\n{pad}\"read\": {read}"));
            }
            out.push('\n');
            out.push_str(&indent(width, level));
            out.push('}');
        }
    }
}

/// Escape one string as a JSON string literal, including the surrounding
/// quotes. Hand-rolled rather than pulled in through `serde_json::Value`
/// because the diagnostic grammar needs behaviors `serde_json` doesn't default
/// to (spec 4.L): `0x7F` (DEL) escaped alongside the C0 controls, and astral
/// codepoints split into UTF-16 surrogate pairs rather than emitted as raw
/// UTF-8 inside the string literal.
fn push_json_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c as u32 == 0x7F => {
                out.push_str(&format!("\\u{:04x}", c as u32))
            }
            c if (c as u32) > 0xFFFF => {
                let v = c as u32 - 0x10000;
                let high = 0xD800 + (v >> 10);
                let low = 0xDC00 + (v & 0x3FF);
                out.push_str(&format!("\\u{high:04x}\\u{low:04x}"));
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weft_of_the_quick_brown_fox() -> &'static str {
        concat!(
            "%WEFT;\n",
            "7,2\n",
            "+0,3\n",
            ".1,5\n",
            ".1,5\n",
            ".1,3\n",
            ".0,0\n",
            "+0,0\n",
            "$0,0\n",
            "The quick brown fox\n",
            "\n",
        )
    }

    #[test]
    fn unpack_reconstitutes_the_original_text() {
        let mut out = Vec::new();
        unpack(weft_of_the_quick_brown_fox().as_bytes(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "The quick brown fox\n");
    }

    #[test]
    fn unpack_with_map_spills_the_embedded_map_verbatim() {
        let mut body = Vec::new();
        let mut map = Vec::new();
        unpack_with_map(
            weft_of_the_quick_brown_fox().as_bytes(),
            &mut body,
            Some(&mut map),
        )
        .unwrap();
        assert_eq!(String::from_utf8(body).unwrap(), "The quick brown fox\n");
        assert_eq!(
            String::from_utf8(map).unwrap(),
            concat!(
                "+0,3\n", ".1,5\n", ".1,5\n", ".1,3\n", ".0,0\n", "+0,0\n", "$0,0\n",
            )
        );
    }

    #[test]
    fn unpack_of_input_with_no_trailing_break_has_none_either() {
        let weft = concat!(
            "%WEFT;\n", "3,1\n", "+0,2\n", ".0,0\n", "$0,0\n", "hi\n",
        );
        let mut out = Vec::new();
        unpack(weft.as_bytes(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "hi");
    }

    #[test]
    fn json_emits_one_outer_array_of_per_line_tuple_arrays() {
        // spec 4.L: "an outer array of inner arrays, each inner array
        // containing the tuple strings".
        let mut out = Vec::new();
        json(weft_of_the_quick_brown_fox().as_bytes(), &mut out, false, None).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text.trim_end(),
            concat!(
                r#"[["","The"," ","quick"," ","brown"," ","fox",""],"#,
                r#"[""]]"#,
            )
        );
    }

    #[test]
    fn json_with_map_appends_raw_records_as_a_trailing_array_element() {
        let mut out = Vec::new();
        json(weft_of_the_quick_brown_fox().as_bytes(), &mut out, true, None).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(r#","[{"op":"NL","skip":0,"read":3}"#));
        assert!(text.contains(r#"{"op":"W","skip":0,"read":0}]],"#));
    }

    #[test]
    fn json_escapes_control_characters_and_quotes() {
        // build a one-word WEFT line whose word contains a quote and a tab
        // (4 codepoints: a, ", TAB, b), closed by a terminal W record.
        let weft = concat!(
            "%WEFT;\n", "3,1\n", "+0,4\n", ".0,0\n", "$0,0\n", "a\"\tb\n",
        );
        let mut out = Vec::new();
        json(weft.as_bytes(), &mut out, false, None).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.trim_end(), r#"[["","a\"\tb",""]]"#);
    }

    #[test]
    fn json_escapes_del_with_dedicated_and_generic_control_escapes() {
        let mut s = String::new();
        push_json_string(&mut s, "\u{7F}\u{08}\u{0C}");
        assert_eq!(s, "\"\\u007f\\b\\f\"");
    }

    #[test]
    fn json_pretty_indents_nested_structures() {
        let weft = concat!("%WEFT;\n", "2,1\n", "+0,0\n", "$0,0\n", "\n");
        let mut out = Vec::new();
        json(weft.as_bytes(), &mut out, false, Some(2)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            concat!(
                "[\n",
                "  [\n",
                "    \"\"\n",
                "  ]\n",
                "]\n",
            )
        );
    }

    #[test]
    fn json_pretty_with_map_nests_the_trailing_records_array() {
        let weft = concat!("%WEFT;\n", "2,1\n", "+0,0\n", "$0,0\n", "\n");
        let mut out = Vec::new();
        json(weft.as_bytes(), &mut out, true, Some(2)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            concat!(
                "[\n",
                "  [\n",
                "    \"\",\n",
                "    [\n",
                "      {\n",
                "        \"op\": \"NL\",\n",
                "        \"skip\": 0,\n",
                "        \"read\": 0\n",
                "      }\n",
                "    ]\n",
                "  ]\n",
                "]\n",
            )
        );
    }

    #[test]
    fn json_splits_astral_codepoints_into_surrogate_pairs() {
        let mut s = String::new();
        push_json_string(&mut s, "\u{1F600}");
        assert_eq!(s, "\"\\ud83d\\ude00\"");
    }
}
