//! Component J: the hyphenator.
//!
//! Per spec 4.J: a content word containing at least one Unicode category `L`
//! codepoint is linguistic and gets NFC-normalized, looked up in an in-memory
//! cache, then (on miss) a specialized word list, then (on further miss) a TeX
//! pattern set; the decision is always written back to the cache. Words without
//! any `L` codepoint pass through unchanged.
//!
//! The TeX pattern set itself is spec 1's one named black box: "the contract
//! given in §6" is the [`HyphenPatterns`] trait below — `word -> ascending split
//! offsets`. [`TexPatterns`] is a real implementation of the classical Liang
//! pattern-matching algorithm (the same one `lex-parser`'s bigger automata are
//! grounded on, see `DESIGN.md`), but it is only one possible implementer of the
//! trait; tests that only care about cache/insertion behavior use a stub.

use crate::error::{WeftError, WeftResult};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use unicode_general_category::{get_general_category, GeneralCategory};
use unicode_normalization::UnicodeNormalization;

const SOFT_HYPHEN: char = '\u{00AD}';
const GRAVE: char = '\u{0060}';

fn is_letter(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

fn is_linguistic(word: &str) -> bool {
    word.chars().any(is_letter)
}

/// The TeX pattern black box's contract (spec 1, 3 "TeX pattern set"): given a
/// word, return the sorted ascending list of codepoint offsets strictly
/// inside it where a hyphen may be inserted.
pub trait HyphenPatterns {
    fn offsets(&self, word: &str) -> WeftResult<Vec<usize>>;
}

/// Encoding style for a loaded TeX pattern file (CLI `-style`, spec 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternStyle {
    Utf8,
    Czech,
    German,
}

impl PatternStyle {
    pub fn parse(name: &str) -> WeftResult<Self> {
        match name {
            "utf8" => Ok(PatternStyle::Utf8),
            "czech" => Ok(PatternStyle::Czech),
            "german" => Ok(PatternStyle::German),
            other => Err(WeftError::Arg(format!(
                "unrecognized hyphenation style {other:?} (expected utf8, czech, or german)"
            ))),
        }
    }
}

/// A compiled TeX hyphenation pattern set, implementing the classical Liang
/// (Knuth-Liang) pattern-matching algorithm used by TeX and its descendants.
pub struct TexPatterns {
    /// `(letters, gap_values)` pairs; `gap_values.len() == letters.len() + 1`.
    patterns: Vec<(Vec<char>, Vec<u8>)>,
}

impl TexPatterns {
    /// Load a TeX pattern file. One or more whitespace-separated pattern
    /// tokens per line; lines starting with `%` (after optional leading
    /// whitespace) are comments and blank lines are ignored.
    pub fn load<R: Read>(input: R, style: PatternStyle) -> WeftResult<Self> {
        let mut bytes = Vec::new();
        let mut reader = input;
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| WeftError::Io(e.to_string()))?;
        let text = decode_pattern_bytes(&bytes, style)?;

        let mut patterns = Vec::new();
        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('%') {
                continue;
            }
            for token in trimmed.split_whitespace() {
                patterns.push(parse_pattern_token(token)?);
            }
        }
        Ok(Self { patterns })
    }
}

fn parse_pattern_token(token: &str) -> WeftResult<(Vec<char>, Vec<u8>)> {
    let mut letters = Vec::new();
    let mut values = Vec::new();
    let mut pending_digit: Option<u8> = None;
    for c in token.chars() {
        if let Some(d) = c.to_digit(10) {
            if pending_digit.replace(d as u8).is_some() {
                return Err(WeftError::HyphenPatterns(format!(
                    "two consecutive digits in pattern token {token:?}"
                )));
            }
        } else {
            values.push(pending_digit.take().unwrap_or(0));
            letters.push(c);
        }
    }
    values.push(pending_digit.take().unwrap_or(0));
    if letters.is_empty() {
        return Err(WeftError::HyphenPatterns(format!(
            "pattern token {token:?} has no letters"
        )));
    }
    Ok((letters, values))
}

impl HyphenPatterns for TexPatterns {
    fn offsets(&self, word: &str) -> WeftResult<Vec<usize>> {
        let lower: Vec<char> = word.chars().flat_map(|c| c.to_lowercase()).collect();
        let word_len = word.chars().count();
        let mut padded = Vec::with_capacity(lower.len() + 2);
        padded.push('.');
        padded.extend(lower.iter().copied());
        padded.push('.');
        let n = padded.len();

        let mut gap_values = vec![0u8; n + 1];
        for (letters, values) in &self.patterns {
            let plen = letters.len();
            if plen > n {
                continue;
            }
            for start in 0..=(n - plen) {
                if padded[start..start + plen] == letters[..] {
                    for (k, &v) in values.iter().enumerate() {
                        let idx = start + k;
                        if v > gap_values[idx] {
                            gap_values[idx] = v;
                        }
                    }
                }
            }
        }

        // Offset `o` (1 <= o < word_len) is the boundary between word[o-1]
        // and word[o], i.e. immediately before padded[o+1] (padded[1] is
        // word[0]), so it reads gap_values[o+1].
        let mut offsets = Vec::new();
        for o in 1..word_len {
            if gap_values[o + 1] % 2 == 1 {
                offsets.push(o);
            }
        }
        Ok(offsets)
    }
}

fn decode_pattern_bytes(bytes: &[u8], style: PatternStyle) -> WeftResult<String> {
    match style {
        PatternStyle::Utf8 => String::from_utf8(bytes.to_vec())
            .map_err(|_| WeftError::Encoding(crate::error::EncodingError::InvalidUtf8)),
        PatternStyle::German => Ok(bytes.iter().map(|&b| b as char).collect()),
        PatternStyle::Czech => Ok(bytes.iter().map(|&b| decode_iso8859_2(b)).collect()),
    }
}

/// ISO 8859-2 (Latin-2) byte -> codepoint, the legacy encoding historically
/// used for Czech TeX hyphenation patterns.
fn decode_iso8859_2(b: u8) -> char {
    if b < 0xA0 {
        return b as char;
    }
    const UPPER: [u32; 96] = [
        0x00A0, 0x0104, 0x02D8, 0x0141, 0x00A4, 0x013D, 0x015A, 0x00A7, 0x00A8, 0x0160, 0x015E,
        0x0164, 0x0179, 0x00AD, 0x017D, 0x017B, 0x00B0, 0x0105, 0x02DB, 0x0142, 0x00B4, 0x013E,
        0x015B, 0x02C7, 0x00B8, 0x0161, 0x015F, 0x0165, 0x017A, 0x02DD, 0x017E, 0x017C, 0x0154,
        0x00C1, 0x00C2, 0x0102, 0x00C4, 0x0139, 0x0106, 0x00C7, 0x010C, 0x00C9, 0x0118, 0x00CB,
        0x011A, 0x00CD, 0x00CE, 0x010E, 0x0110, 0x0143, 0x0147, 0x00D3, 0x00D4, 0x0150, 0x00D6,
        0x00D7, 0x0158, 0x016E, 0x00DA, 0x0170, 0x00DC, 0x00DD, 0x0162, 0x00DF, 0x0155, 0x00E1,
        0x00E2, 0x0103, 0x00E4, 0x013A, 0x0107, 0x00E7, 0x010D, 0x00E9, 0x0119, 0x00EB, 0x011B,
        0x00ED, 0x00EE, 0x010F, 0x0111, 0x0144, 0x0148, 0x00F3, 0x00F4, 0x0151, 0x00F6, 0x00F7,
        0x0159, 0x016F, 0x00FA, 0x0171, 0x00FC, 0x00FD, 0x0163, 0x02D9,
    ];
    char::from_u32(UPPER[(b - 0xA0) as usize]).unwrap_or('\u{FFFD}')
}

/// Per-process hyphenation context: cache, optional specialized word list,
/// optional TeX pattern set. Groups the state spec 9's "global state ->
/// explicit handles" note calls for, so a library embedder owns one struct
/// rather than process singletons.
pub struct Hyphenator {
    cache: HashMap<String, String>,
    specialized: HashMap<String, String>,
    patterns: Option<Box<dyn HyphenPatterns>>,
}

impl Hyphenator {
    pub fn new(specialized: HashMap<String, String>, patterns: Option<Box<dyn HyphenPatterns>>) -> Self {
        Self {
            cache: HashMap::new(),
            specialized,
            patterns,
        }
    }

    /// Hyphenate one content word, or pass it through unchanged if it has no
    /// `L` codepoint. Fatal ([`WeftError::WordSyntax`]) if a linguistic word
    /// contains whitespace, CR, LF, or a grave accent.
    pub fn hyphenate(&mut self, word: &str) -> WeftResult<String> {
        if !is_linguistic(word) {
            return Ok(word.to_string());
        }
        if word.chars().any(|c| c.is_whitespace() || c == GRAVE) {
            return Err(WeftError::WordSyntax(format!(
                "linguistic word {word:?} contains whitespace, a line break, or a grave accent"
            )));
        }

        let key: String = word.nfc().collect();
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached.clone());
        }

        let value = if let Some(special) = self.specialized.get(&key) {
            special.clone()
        } else if let Some(patterns) = &self.patterns {
            let offsets = patterns.offsets(&key)?;
            insert_soft_hyphens(&key, &offsets)
        } else {
            key.clone()
        };

        self.cache.insert(key, value.clone());
        Ok(value)
    }

    /// Export the cache as a sorted word list (spec 4.J, 6): one entry per
    /// line, soft hyphens rendered back as grave accents, sorted by
    /// descending (grave-excluded) length, then a simplified ordinal
    /// collation, stable across the two passes.
    pub fn export_word_list(&self) -> Vec<String> {
        let mut entries: Vec<String> = self
            .cache
            .values()
            .map(|v| v.chars().map(|c| if c == SOFT_HYPHEN { GRAVE } else { c }).collect())
            .collect();
        entries.sort_by(|a, b| {
            let len_a = a.chars().filter(|&c| c != GRAVE).count();
            let len_b = b.chars().filter(|&c| c != GRAVE).count();
            len_b.cmp(&len_a).then_with(|| {
                let key_a: String = a.chars().filter(|&c| c != GRAVE).collect();
                let key_b: String = b.chars().filter(|&c| c != GRAVE).collect();
                key_a.cmp(&key_b)
            })
        });
        entries
    }
}

fn insert_soft_hyphens(word: &str, offsets: &[usize]) -> String {
    let chars: Vec<char> = word.chars().collect();
    let mut out = String::with_capacity(chars.len() + offsets.len());
    for (i, c) in chars.iter().enumerate() {
        if offsets.contains(&i) {
            out.push(SOFT_HYPHEN);
        }
        out.push(*c);
    }
    out
}

/// Parse one line of a word-list file (spec 6 "Word list file format"):
/// grave accents mark hyphen points; neither the first nor last character
/// may be a grave, and graves must not be adjacent. Returns `(key, value)`
/// where `key` has the graves stripped and `value` has them replaced by
/// soft hyphens, both after trimming SP/HT and NFC normalization.
pub fn parse_word_list_line(line: &str) -> WeftResult<(String, String)> {
    let trimmed = line.trim_matches([' ', '\t']);
    let normalized: String = trimmed.nfc().collect();
    let chars: Vec<char> = normalized.chars().collect();
    if chars.is_empty() {
        return Err(WeftError::WordSyntax("empty word-list line".to_string()));
    }
    if chars.first() == Some(&GRAVE) || chars.last() == Some(&GRAVE) {
        return Err(WeftError::WordSyntax(format!(
            "word-list entry {normalized:?} starts or ends with a grave accent"
        )));
    }
    for pair in chars.windows(2) {
        if pair[0] == GRAVE && pair[1] == GRAVE {
            return Err(WeftError::WordSyntax(format!(
                "word-list entry {normalized:?} has adjacent grave accents"
            )));
        }
    }
    let key: String = chars.iter().filter(|&&c| c != GRAVE).collect();
    let value: String = chars
        .iter()
        .map(|&c| if c == GRAVE { SOFT_HYPHEN } else { c })
        .collect();
    Ok((key, value))
}

/// Load a specialized word list or `-list` export file into a `key -> value`
/// map (shared shape for both the `-special` input and the `-list` export's
/// round trip). Multiple occurrences of the same key must agree.
pub fn load_word_list<R: Read>(input: R) -> WeftResult<HashMap<String, String>> {
    let mut map = HashMap::new();
    for line in BufReader::new(input).lines() {
        let line = line.map_err(|e| WeftError::Io(e.to_string()))?;
        if line.trim().is_empty() {
            continue;
        }
        let (key, value) = parse_word_list_line(&line)?;
        if let Some(existing) = map.get(&key) {
            if existing != &value {
                return Err(WeftError::WordSyntax(format!(
                    "word-list entry {key:?} has conflicting hyphenations"
                )));
            }
        } else {
            map.insert(key, value);
        }
    }
    Ok(map)
}

/// Write a sorted word list (as produced by [`Hyphenator::export_word_list`])
/// to `out`, one entry per line.
pub fn write_word_list<W: Write>(entries: &[String], mut out: W) -> WeftResult<()> {
    for entry in entries {
        writeln!(out, "{entry}").map_err(|e| WeftError::Io(e.to_string()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedOffsets(Vec<usize>);
    impl HyphenPatterns for FixedOffsets {
        fn offsets(&self, _word: &str) -> WeftResult<Vec<usize>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn s5_inserts_soft_hyphens_at_given_offsets() {
        // offsets 2, 6, 7 split "hyphenation" into hy | phen | a | tion.
        let mut h = Hyphenator::new(HashMap::new(), Some(Box::new(FixedOffsets(vec![2, 6, 7]))));
        let out = h.hyphenate("hyphenation").unwrap();
        assert_eq!(out, "hy\u{00AD}phen\u{00AD}a\u{00AD}tion");
    }

    #[test]
    fn non_linguistic_word_passes_through_and_is_not_cached() {
        let mut h = Hyphenator::new(HashMap::new(), Some(Box::new(FixedOffsets(vec![]))));
        assert_eq!(h.hyphenate("1234").unwrap(), "1234");
        assert!(h.export_word_list().is_empty());
    }

    #[test]
    fn specialized_list_overrides_patterns() {
        let mut specialized = HashMap::new();
        specialized.insert("hyphenation".to_string(), "hy\u{00AD}phenation".to_string());
        let mut h = Hyphenator::new(specialized, Some(Box::new(FixedOffsets(vec![2, 6, 9]))));
        assert_eq!(h.hyphenate("hyphenation").unwrap(), "hy\u{00AD}phenation");
    }

    #[test]
    fn no_patterns_and_no_specialized_passes_through_unchanged() {
        let mut h = Hyphenator::new(HashMap::new(), None);
        assert_eq!(h.hyphenate("hello").unwrap(), "hello");
    }

    #[test]
    fn decisions_are_cached() {
        let mut h = Hyphenator::new(HashMap::new(), Some(Box::new(FixedOffsets(vec![2]))));
        assert_eq!(h.hyphenate("abcdef").unwrap(), "ab\u{00AD}cdef");
        // second call must hit the cache and return the identical value even
        // if patterns were (hypothetically) to change their answer.
        let again = h.hyphenate("abcdef").unwrap();
        assert_eq!(again, "ab\u{00AD}cdef");
    }

    #[test]
    fn fatal_on_whitespace_or_grave_in_a_linguistic_word() {
        let mut h = Hyphenator::new(HashMap::new(), None);
        assert!(matches!(h.hyphenate("ab cd"), Err(WeftError::WordSyntax(_))));
        assert!(matches!(h.hyphenate("ab`cd"), Err(WeftError::WordSyntax(_))));
    }

    #[test]
    fn export_sorts_by_descending_length_then_collation() {
        let mut h = Hyphenator::new(HashMap::new(), Some(Box::new(FixedOffsets(vec![]))));
        h.hyphenate("bb").unwrap();
        h.hyphenate("a").unwrap();
        h.hyphenate("ccc").unwrap();
        h.hyphenate("dd").unwrap();
        assert_eq!(h.export_word_list(), vec!["ccc", "bb", "dd", "a"]);
    }

    #[test]
    fn word_list_line_parses_graves_into_soft_hyphens() {
        let (key, value) = parse_word_list_line("hy`phen`a`tion").unwrap();
        assert_eq!(key, "hyphenation");
        assert_eq!(value, "hy\u{00AD}phen\u{00AD}a\u{00AD}tion");
    }

    #[test]
    fn word_list_line_rejects_leading_grave() {
        assert!(matches!(
            parse_word_list_line("`abc"),
            Err(WeftError::WordSyntax(_))
        ));
    }

    #[test]
    fn word_list_line_rejects_adjacent_graves() {
        assert!(matches!(
            parse_word_list_line("ab``cd"),
            Err(WeftError::WordSyntax(_))
        ));
    }

    #[test]
    fn tex_patterns_liang_algorithm_matches_hand_worked_example() {
        // Mirrors the classic worked example: patterns for "hyphenation"
        // restricted to the substrings the comment in the grounding reference
        // (see DESIGN.md) walks through by hand.
        let src = "hy3ph he2n hena4 hen5at 1na n2at 1tio 2io o2n";
        let patterns = TexPatterns::load(src.as_bytes(), PatternStyle::Utf8).unwrap();
        let offsets = patterns.offsets("hyphenation").unwrap();
        assert_eq!(offsets, vec![2, 6]);
    }

    #[test]
    fn loads_and_decodes_czech_style_patterns() {
        // 0xE8 in ISO 8859-2 is 'č' (U+010D); confirm the decoder round-trips
        // through a pattern token rather than just passing bytes through.
        let bytes = [b'a', 0xE8, b'1', b'b'];
        let patterns = TexPatterns::load(&bytes[..], PatternStyle::Czech).unwrap();
        assert_eq!(patterns.patterns.len(), 1);
        assert_eq!(patterns.patterns[0].0, vec!['a', '\u{010D}', 'b']);
    }
}
