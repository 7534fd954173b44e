//! Component G: the plain-text source.
//!
//! Content words are maximal runs of codepoints outside `{SP, HT, CR, LF}`
//! (spec 4.G). Since [`weft_core::codepoint::split_lines`] has already split
//! the input on LF/CRLF, a body line's characters can never contain CR or LF,
//! so in practice only SP/HT need checking here; the full set is kept in the
//! whitespace predicate for fidelity to the spec's wording.

use weft_core::codepoint::{read_to_string, split_lines};
use weft_core::writer::WeftWriter;
use weft_core::{LineTuple, WeftResult};
use std::io::{Read, Write};

fn is_plain_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Split one already-line-split body line into its `(skip, word)*, skip` tuple.
pub fn tokenize_line(line: &str) -> LineTuple {
    let chars: Vec<char> = line.chars().collect();
    let mut tuple = Vec::new();
    let mut skip = String::new();
    let mut i = 0;
    while i < chars.len() {
        if is_plain_whitespace(chars[i]) {
            skip.push(chars[i]);
            i += 1;
        } else {
            tuple.push(std::mem::take(&mut skip));
            let start = i;
            while i < chars.len() && !is_plain_whitespace(chars[i]) {
                i += 1;
            }
            tuple.push(chars[start..i].iter().collect());
        }
    }
    tuple.push(skip);
    tuple
}

/// Package a plain-text stream as a complete WEFT container.
pub fn source<R: Read, W: Write>(input: R, output: W) -> WeftResult<()> {
    let text = read_to_string(input)?;
    let lines = split_lines(&text)?;
    let mut writer = WeftWriter::new()?;
    for line in &lines {
        writer.write_line(&tokenize_line(line))?;
    }
    writer.close(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_tokenizes_the_quick_brown_fox() {
        assert_eq!(
            tokenize_line("The quick brown fox"),
            vec!["", "The", " ", "quick", " ", "brown", " ", "fox", ""]
        );
    }

    #[test]
    fn a_line_with_no_words_is_a_single_skip() {
        assert_eq!(tokenize_line(""), vec![""]);
        assert_eq!(tokenize_line("   "), vec!["   "]);
    }

    #[test]
    fn leading_and_trailing_whitespace_are_captured() {
        assert_eq!(tokenize_line("  hi  "), vec!["  ", "hi", "  "]);
    }

    #[test]
    fn tabs_are_whitespace_too() {
        assert_eq!(tokenize_line("a\tb"), vec!["", "a", "\t", "b", ""]);
    }

    #[test]
    fn s1_round_trips_through_source_and_reader() {
        let mut out = Vec::new();
        source("The quick brown fox\n".as_bytes(), &mut out).unwrap();
        let weft = String::from_utf8(out).unwrap();
        assert_eq!(
            weft,
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
        );
    }

    #[test]
    fn completely_empty_input_is_a_single_empty_body_line() {
        // Resolves spec 9's open question: an empty input produces exactly
        // one empty body line (from `split_lines`'s own convention), not a
        // zero-line map or an extra terminator record.
        let mut out = Vec::new();
        source("".as_bytes(), &mut out).unwrap();
        let weft = String::from_utf8(out).unwrap();
        assert_eq!(weft, "%WEFT;\n2,1\n+0,0\n$0,0\n\n");
    }
}
