//! Component H: the markup-aware source tokenizer.
//!
//! A line-spanning state machine over XML/HTML (spec 4.H). Eleven named
//! [`Location`]s classify every codepoint; only [`Location::Char`] may emit
//! content words. Entity references are decoded within `char`, `tag`,
//! `tag-att-sq` and `tag-att-dq`, then the decoded text is re-escaped so `&`,
//! `<`, `>` never leak unescaped into WEFT body text (and `'`/`"` inside the
//! matching quoted-attribute location).
//!
//! Per spec 9's "cyclic or multi-role state" note, the four concerns this
//! machine mixes -- classification, whitespace splitting, entity decoding,
//! and skip accumulation -- are kept as separate functions threaded through
//! one mutable line cursor and skip buffer, rather than folded into a single
//! monolithic loop body. [`MarkupTokenizer::tokenize_line`] is the cursor;
//! [`decode_and_reescape_one`] and [`detect_opener`] are the pure helpers.
//!
//! Resumption across line boundaries is the only cross-line state: a
//! construct whose *opener* (`<!--`, `<![CDATA[`, `<?xml`, `<!DOCTYPE`) is
//! itself split across a line break is not recognized as that construct --
//! the trailing `<` is treated as a bare tag opener instead. This is a
//! pragmatic reading of an edge case the spec doesn't address (real markup
//! essentially never splits an opener token across a line), recorded as an
//! Open Question resolution in `DESIGN.md`. Content words themselves never
//! span lines, since each WEFT line is independently mapped.

use weft_core::codepoint::{read_to_string, split_lines};
use weft_core::entities;
use weft_core::error::{WeftError, WeftResult};
use weft_core::writer::WeftWriter;
use weft_core::xml_policy;
use weft_core::LineTuple;
use std::io::{Read, Write};

/// One of the eleven classifier states of spec 4.H.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Char,
    Tag,
    TagAttSq,
    TagAttDq,
    Comment,
    Cdata,
    Doctype,
    DoctypeAttSq,
    DoctypeAttDq,
    Pi,
    XmlDecl,
}

impl Location {
    /// Parse one of the eleven location names used by the CLI `-begin` flag.
    pub fn parse(name: &str) -> WeftResult<Self> {
        match name {
            "char" => Ok(Location::Char),
            "tag" => Ok(Location::Tag),
            "tag-att-sq" => Ok(Location::TagAttSq),
            "tag-att-dq" => Ok(Location::TagAttDq),
            "comment" => Ok(Location::Comment),
            "CDATA" => Ok(Location::Cdata),
            "doctype" => Ok(Location::Doctype),
            "doctype-att-sq" => Ok(Location::DoctypeAttSq),
            "doctype-att-dq" => Ok(Location::DoctypeAttDq),
            "pi" => Ok(Location::Pi),
            "xml-decl" => Ok(Location::XmlDecl),
            other => Err(WeftError::Arg(format!(
                "unrecognized tokenizer state {other:?} (expected one of: char, tag, \
                 tag-att-sq, tag-att-dq, comment, CDATA, doctype, doctype-att-sq, \
                 doctype-att-dq, pi, xml-decl)"
            ))),
        }
    }
}

/// Whether re-escaping this location's decoded text must also fold back a
/// quote character (`'` in `tag-att-sq`, `"` in `tag-att-dq`).
fn reescape_char(c: char, loc: Location) -> &'static str {
    match c {
        '&' => "&amp;",
        '<' => "&lt;",
        '>' => "&gt;",
        '\'' if loc == Location::TagAttSq => "&apos;",
        '"' if loc == Location::TagAttDq => "&quot;",
        _ => "",
    }
}

/// Re-escape one already-decoded codepoint for `loc`, returning it unchanged
/// if it needs no special handling there.
fn reescape_one(c: char, loc: Location) -> String {
    let special = reescape_char(c, loc);
    if special.is_empty() {
        c.to_string()
    } else {
        special.to_string()
    }
}

fn malformed_entity_error(name: &str) -> WeftError {
    WeftError::EntityUnknown(name.to_string())
}

/// Resolve one entity name (without `&`/`;`) to its decoded codepoint
/// sequence, validating every codepoint against the XML codepoint policy.
/// Never called for [`Location::Tag`] -- a raw `&` there is fatal before any
/// entity parsing is attempted (spec 4.H, "`&` forbidden outside quotes").
fn resolve_entity(name: &str) -> WeftResult<String> {
    if let Some(rest) = name.strip_prefix('#') {
        let (is_hex, digits) = match rest.strip_prefix(['x', 'X']) {
            Some(d) => (true, d),
            None => (false, rest),
        };
        if digits.is_empty() {
            return Err(malformed_entity_error(name));
        }
        let cp = if is_hex {
            u32::from_str_radix(digits, 16).map_err(|_| malformed_entity_error(name))?
        } else {
            digits.parse::<u32>().map_err(|_| malformed_entity_error(name))?
        };
        let c = char::from_u32(cp).ok_or(WeftError::EntityInvalidCodepoint(cp))?;
        if !xml_policy::is_valid(c) {
            return Err(WeftError::EntityInvalidCodepoint(cp));
        }
        Ok(c.to_string())
    } else {
        match entities::lookup(name) {
            Some(codepoints) => {
                let mut out = String::new();
                for &c in codepoints {
                    if !xml_policy::is_valid(c) {
                        return Err(WeftError::EntityInvalidCodepoint(c as u32));
                    }
                    out.push(c);
                }
                Ok(out)
            }
            None => Err(WeftError::EntityUnknown(name.to_string())),
        }
    }
}

/// Parse one `&name;` reference starting at `chars[at]` (which must be `&`).
/// Returns the number of source codepoints consumed (including `&` and `;`)
/// and the decoded, not-yet-re-escaped, replacement text. Only called from
/// `char`, `tag-att-sq` and `tag-att-dq` -- entity decoding never runs in
/// `tag` itself, where any `&` is fatal regardless of what follows it.
fn parse_entity(chars: &[char], at: usize) -> WeftResult<(usize, String)> {
    debug_assert_eq!(chars[at], '&');
    let mut j = at + 1;
    let mut name = String::new();
    while j < chars.len() && (chars[j].is_ascii_alphanumeric() || chars[j] == '#') {
        name.push(chars[j]);
        j += 1;
    }
    if name.is_empty() || j >= chars.len() || chars[j] != ';' {
        return Err(malformed_entity_error(&name));
    }
    let resolved = resolve_entity(&name)?;
    Ok((j + 1 - at, resolved))
}

fn starts_with_cs(chars: &[char], at: usize, pat: &str) -> bool {
    let pat: Vec<char> = pat.chars().collect();
    at + pat.len() <= chars.len() && chars[at..at + pat.len()] == pat[..]
}

fn starts_with_ci(chars: &[char], at: usize, pat: &str) -> bool {
    let pat: Vec<char> = pat.chars().collect();
    at + pat.len() <= chars.len()
        && chars[at..at + pat.len()]
            .iter()
            .zip(pat.iter())
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
}

/// Decide which location a `<` at `chars[at]` opens, in spec 4.H's priority
/// order, and how many codepoints the opener token itself occupies.
fn detect_opener(chars: &[char], at: usize) -> (Location, usize) {
    if starts_with_ci(chars, at, "<?xml") {
        (Location::XmlDecl, 5)
    } else if starts_with_cs(chars, at, "<?") {
        (Location::Pi, 2)
    } else if starts_with_ci(chars, at, "<!DOCTYPE") {
        (Location::Doctype, 9)
    } else if starts_with_cs(chars, at, "<![CDATA[") {
        (Location::Cdata, 9)
    } else if starts_with_cs(chars, at, "<!--") {
        (Location::Comment, 4)
    } else {
        (Location::Tag, 1)
    }
}

/// Per-line tuple builder shared by the `char`-location loop: tracks the
/// skip run accumulated since the last committed word, and the word (if
/// any) currently being accumulated.
struct LineBuilder {
    tuple: LineTuple,
    pending_skip: String,
    word: String,
    in_word: bool,
}

impl LineBuilder {
    fn new() -> Self {
        Self {
            tuple: Vec::new(),
            pending_skip: String::new(),
            word: String::new(),
            in_word: false,
        }
    }

    /// Emit one decoded, not-yet-re-escaped character data codepoint.
    /// Validates `c` against the XML codepoint policy first (spec 4.H: "Every
    /// resulting codepoint is validated by the XML predicate... invalid
    /// codepoints are a fatal error") -- this covers both literal character
    /// data and entity-decoded replacement text, since both ultimately pass
    /// through here.
    fn emit_char(&mut self, c: char) -> WeftResult<()> {
        if !xml_policy::is_valid(c) {
            return Err(WeftError::EntityInvalidCodepoint(c as u32));
        }
        let text = reescape_one(c, Location::Char);
        if c == ' ' || c == '\t' {
            if self.in_word {
                self.tuple.push(std::mem::take(&mut self.pending_skip));
                self.tuple.push(std::mem::take(&mut self.word));
                self.in_word = false;
            }
            self.pending_skip.push_str(&text);
        } else {
            self.word.push_str(&text);
            self.in_word = true;
        }
        Ok(())
    }

    /// Append raw (non-`char`-location) text verbatim to the skip run.
    fn push_skip(&mut self, text: &str) {
        if self.in_word {
            self.tuple.push(std::mem::take(&mut self.pending_skip));
            self.tuple.push(std::mem::take(&mut self.word));
            self.in_word = false;
        }
        self.pending_skip.push_str(text);
    }

    fn finish(mut self) -> LineTuple {
        if self.in_word {
            self.tuple.push(std::mem::take(&mut self.pending_skip));
            self.tuple.push(std::mem::take(&mut self.word));
        }
        self.tuple.push(self.pending_skip);
        self.tuple
    }
}

/// Resumable markup tokenizer: one instance carries classifier state across
/// every line of a document (or fragment) passed to [`tokenize_line`].
pub struct MarkupTokenizer {
    state: Location,
}

impl MarkupTokenizer {
    pub fn new(initial: Location) -> Self {
        Self { state: initial }
    }

    /// Tokenize one already-line-split body line, carrying the classifier
    /// state into and out of the call.
    pub fn tokenize_line(&mut self, line: &str) -> WeftResult<LineTuple> {
        let chars: Vec<char> = line.chars().collect();
        let n = chars.len();
        let mut i = 0usize;
        let mut b = LineBuilder::new();

        while i < n {
            match self.state {
                Location::Char => {
                    if chars[i] == '<' {
                        let (loc, len) = detect_opener(&chars, i);
                        let opener: String = chars[i..i + len].iter().collect();
                        b.push_skip(&opener);
                        i += len;
                        self.state = loc;
                    } else if chars[i] == '&' {
                        let (consumed, resolved) = parse_entity(&chars, i)?;
                        i += consumed;
                        for c in resolved.chars() {
                            b.emit_char(c)?;
                        }
                    } else {
                        b.emit_char(chars[i])?;
                        i += 1;
                    }
                }
                Location::Tag => match chars[i] {
                    '\'' => {
                        b.push_skip("'");
                        i += 1;
                        self.state = Location::TagAttSq;
                    }
                    '"' => {
                        b.push_skip("\"");
                        i += 1;
                        self.state = Location::TagAttDq;
                    }
                    '>' => {
                        b.push_skip(">");
                        i += 1;
                        self.state = Location::Char;
                    }
                    '&' => {
                        // spec 4.H: "Inside `tag` (outside quotes), a raw `&`
                        // anywhere in the tag text is fatal" -- unlike the
                        // other markup locations, a well-formed `&entity;` is
                        // not an exception, so this never reaches `parse_entity`.
                        return Err(WeftError::AmpersandInTag);
                    }
                    c => {
                        b.push_skip(&reescape_one(c, Location::Tag));
                        i += 1;
                    }
                },
                Location::TagAttSq => match chars[i] {
                    '\'' => {
                        b.push_skip("'");
                        i += 1;
                        self.state = Location::Tag;
                    }
                    '&' => {
                        let (consumed, resolved) = parse_entity(&chars, i)?;
                        i += consumed;
                        for c in resolved.chars() {
                            b.push_skip(&reescape_one(c, Location::TagAttSq));
                        }
                    }
                    c => {
                        b.push_skip(&reescape_one(c, Location::TagAttSq));
                        i += 1;
                    }
                },
                Location::TagAttDq => match chars[i] {
                    '"' => {
                        b.push_skip("\"");
                        i += 1;
                        self.state = Location::Tag;
                    }
                    '&' => {
                        let (consumed, resolved) = parse_entity(&chars, i)?;
                        i += consumed;
                        for c in resolved.chars() {
                            b.push_skip(&reescape_one(c, Location::TagAttDq));
                        }
                    }
                    c => {
                        b.push_skip(&reescape_one(c, Location::TagAttDq));
                        i += 1;
                    }
                },
                Location::Comment => {
                    if starts_with_cs(&chars, i, "-->") {
                        b.push_skip("-->");
                        i += 3;
                        self.state = Location::Char;
                    } else {
                        b.push_skip(&chars[i].to_string());
                        i += 1;
                    }
                }
                Location::Cdata => {
                    if starts_with_cs(&chars, i, "]]>") {
                        b.push_skip("]]>");
                        i += 3;
                        self.state = Location::Char;
                    } else {
                        b.push_skip(&chars[i].to_string());
                        i += 1;
                    }
                }
                Location::Doctype => match chars[i] {
                    '\'' => {
                        b.push_skip("'");
                        i += 1;
                        self.state = Location::DoctypeAttSq;
                    }
                    '"' => {
                        b.push_skip("\"");
                        i += 1;
                        self.state = Location::DoctypeAttDq;
                    }
                    '>' => {
                        b.push_skip(">");
                        i += 1;
                        self.state = Location::Char;
                    }
                    c => {
                        b.push_skip(&c.to_string());
                        i += 1;
                    }
                },
                Location::DoctypeAttSq => {
                    if chars[i] == '\'' {
                        b.push_skip("'");
                        i += 1;
                        self.state = Location::Doctype;
                    } else {
                        b.push_skip(&chars[i].to_string());
                        i += 1;
                    }
                }
                Location::DoctypeAttDq => {
                    if chars[i] == '"' {
                        b.push_skip("\"");
                        i += 1;
                        self.state = Location::Doctype;
                    } else {
                        b.push_skip(&chars[i].to_string());
                        i += 1;
                    }
                }
                Location::Pi => {
                    if starts_with_cs(&chars, i, "?>") {
                        b.push_skip("?>");
                        i += 2;
                        self.state = Location::Char;
                    } else {
                        b.push_skip(&chars[i].to_string());
                        i += 1;
                    }
                }
                Location::XmlDecl => {
                    if starts_with_cs(&chars, i, "?>") {
                        b.push_skip("?>");
                        i += 2;
                        self.state = Location::Char;
                    } else {
                        b.push_skip(&chars[i].to_string());
                        i += 1;
                    }
                }
            }
        }

        Ok(b.finish())
    }
}

/// Package a markup stream as a complete WEFT container, beginning the
/// tokenizer in the given (possibly non-`char`) state.
pub fn source<R: Read, W: Write>(input: R, output: W, begin: Location) -> WeftResult<()> {
    let text = read_to_string(input)?;
    let lines = split_lines(&text)?;
    let mut tokenizer = MarkupTokenizer::new(begin);
    let mut writer = WeftWriter::new()?;
    for line in &lines {
        let tuple = tokenizer.tokenize_line(line)?;
        writer.write_line(&tuple)?;
    }
    writer.close(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize_fresh(line: &str) -> LineTuple {
        MarkupTokenizer::new(Location::Char).tokenize_line(line).unwrap()
    }

    #[test]
    fn s2_html_first_line() {
        assert_eq!(
            tokenize_fresh("<p>The quick brown <i>fox</i><br/>"),
            vec![
                "<p>", "The", " ", "quick", " ", "brown", " ", "<i>", "fox", "</i><br/>"
            ]
        );
    }

    #[test]
    fn s2_html_second_line() {
        assert_eq!(
            tokenize_fresh("jumps over the <b>lazy</b> dog.</p>"),
            vec![
                "", "jumps", " ", "over", " ", "the", " ", "<b>", "lazy", "</b> ", "dog.", "</p>"
            ]
        );
    }

    #[test]
    fn s3_entities_round_trip() {
        // "A &amp; B &#x41;&#65; C&apos;D" -> A, &amp;, B, AA, C'D
        let tuple = tokenize_fresh("A &amp; B &#x41;&#65; C&apos;D");
        let words: Vec<&str> = tuple.iter().skip(1).step_by(2).map(|s| s.as_str()).collect();
        assert_eq!(words, vec!["A", "&amp;", "B", "AA", "C'D"]);
    }

    #[test]
    fn comment_is_opaque_and_emits_no_words() {
        let tuple = tokenize_fresh("<!-- a comment with words --> text");
        // only "text" should be a content word; comment interior never splits.
        let words: Vec<&str> = tuple.iter().skip(1).step_by(2).map(|s| s.as_str()).collect();
        assert_eq!(words, vec!["text"]);
    }

    #[test]
    fn cdata_is_opaque() {
        let tuple = tokenize_fresh("<![CDATA[ <not a tag> ]]>done");
        let words: Vec<&str> = tuple.iter().skip(1).step_by(2).map(|s| s.as_str()).collect();
        assert_eq!(words, vec!["done"]);
    }

    #[test]
    fn doctype_with_quoted_attrs_emits_no_words() {
        let tuple = tokenize_fresh(
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD XHTML 1.0//EN\" 'id'> hi",
        );
        let words: Vec<&str> = tuple.iter().skip(1).step_by(2).map(|s| s.as_str()).collect();
        assert_eq!(words, vec!["hi"]);
    }

    #[test]
    fn xml_decl_and_pi_are_recognized() {
        let tuple = tokenize_fresh("<?xml version=\"1.0\"?><?pi data?>body");
        let words: Vec<&str> = tuple.iter().skip(1).step_by(2).map(|s| s.as_str()).collect();
        assert_eq!(words, vec!["body"]);
    }

    #[test]
    fn unknown_entity_is_fatal() {
        let result = MarkupTokenizer::new(Location::Char).tokenize_line("a &bogus; b");
        assert!(matches!(result, Err(WeftError::EntityUnknown(_))));
    }

    #[test]
    fn raw_ampersand_in_tag_is_fatal() {
        let result = MarkupTokenizer::new(Location::Char).tokenize_line("<a href=x&y>");
        assert!(matches!(result, Err(WeftError::AmpersandInTag)));
    }

    #[test]
    fn well_formed_entity_in_tag_is_still_fatal() {
        // spec 4.H: a raw `&` in `tag` (outside quotes) is fatal even when
        // what follows it would otherwise be a well-formed entity.
        let result = MarkupTokenizer::new(Location::Char).tokenize_line("<a b=&amp;>");
        assert!(matches!(result, Err(WeftError::AmpersandInTag)));
    }

    #[test]
    fn literal_invalid_codepoint_in_char_data_is_fatal() {
        // U+000B (vertical tab) is a C0 control outside {tab, LF, CR} and
        // fails the XML codepoint policy even as literal character data,
        // not just when it arrives via a numeric entity.
        let result = MarkupTokenizer::new(Location::Char).tokenize_line("a \u{000B} b");
        assert!(matches!(result, Err(WeftError::EntityInvalidCodepoint(_))));
    }

    #[test]
    fn invalid_numeric_entity_codepoint_is_fatal() {
        let result = MarkupTokenizer::new(Location::Char).tokenize_line("a &#xFFFE; b");
        assert!(matches!(result, Err(WeftError::EntityInvalidCodepoint(_))));
    }

    #[test]
    fn resumes_mid_comment_across_calls() {
        let mut tok = MarkupTokenizer::new(Location::Comment);
        let first = tok.tokenize_line("still inside the comment").unwrap();
        assert_eq!(first, vec!["still inside the comment"]);
        let second = tok.tokenize_line("-->now text").unwrap();
        let words: Vec<&str> = second.iter().skip(1).step_by(2).map(|s| s.as_str()).collect();
        assert_eq!(words, vec!["now", "text"]);
    }

    #[test]
    fn begin_state_names_round_trip() {
        for name in [
            "char",
            "tag",
            "tag-att-sq",
            "tag-att-dq",
            "comment",
            "CDATA",
            "doctype",
            "doctype-att-sq",
            "doctype-att-dq",
            "pi",
            "xml-decl",
        ] {
            assert!(Location::parse(name).is_ok(), "expected {name:?} to parse");
        }
        assert!(Location::parse("bogus").is_err());
    }

    #[test]
    fn no_bare_whitespace_outside_char_location_splits_words() {
        // whitespace inside a tag is markup structure, not a word boundary
        // for anything -- the whole tag text goes into one skip run.
        let tuple = tokenize_fresh("<a href=\"x\" class='y'>word</a>");
        assert_eq!(tuple[0], "<a href=\"x\" class='y'>");
        assert_eq!(tuple[1], "word");
    }
}
