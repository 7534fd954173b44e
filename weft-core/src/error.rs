//! Error types shared by every stage of the WEFT pipeline.

use std::fmt;

/// Errors that can occur while reading, writing, or transforming WEFT data.
///
/// Every variant is fatal to the invocation that raised it (spec-level: the
/// map-body binding makes partial recovery meaningless), so callers at the
/// CLI layer should print [`Display`](fmt::Display) to stderr and exit non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeftError {
    /// An I/O error occurred reading or writing a stream.
    Io(String),
    /// Input was not valid UTF-8, contained a stray CR, or an unexpected surrogate.
    Encoding(EncodingError),
    /// The WEFT signature line (`%WEFT;`) was missing or malformed.
    WeftSignature,
    /// The WEFT declaration line (`N,M`) was missing or malformed.
    WeftHeader,
    /// A map record failed to parse.
    MapSyntax(String),
    /// A map record's shape or accounting disagreed with the body.
    MapMismatch(String),
    /// The input ended before the declared number of map records or body lines arrived.
    Truncated,
    /// An entity reference name did not resolve to a known HTML5 entity.
    EntityUnknown(String),
    /// An entity reference decoded to a codepoint rejected by the XML codepoint policy.
    EntityInvalidCodepoint(u32),
    /// A literal, undecoded `&` appeared in tag text outside a quoted attribute.
    AmpersandInTag,
    /// A content word contained whitespace, CR, LF, or a grave accent where none is allowed.
    WordSyntax(String),
    /// A Woof table line did not match the table grammar.
    WoofSyntax(String),
    /// A Woof table key is a proper prefix of another key (first-match ambiguity).
    WoofAmbiguous(String, String),
    /// A table file (Woof table, TeX pattern file, specialized word list) was missing.
    TableMissing(String),
    /// A command-line argument was malformed or unrecognized.
    Arg(String),
    /// A caller violated an internal API precondition (e.g. an empty content word
    /// passed to the writer). Not named in the spec's error taxonomy because it
    /// guards library misuse rather than a user-facing failure mode.
    Contract(String),
    /// The TeX pattern black box returned split offsets outside the word it hyphenated.
    HyphenPatterns(String),
}

/// Sub-kinds of [`WeftError::Encoding`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    InvalidUtf8,
    StrayCarriageReturn,
    EmbeddedLineBreak,
}

impl fmt::Display for WeftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeftError::Io(msg) => write!(f, "I/O error: {msg}"),
            WeftError::Encoding(e) => write!(f, "encoding error: {e}"),
            WeftError::WeftSignature => write!(f, "missing or malformed %WEFT; signature"),
            WeftError::WeftHeader => write!(f, "missing or malformed WEFT declaration line"),
            WeftError::MapSyntax(detail) => write!(f, "map syntax error: {detail}"),
            WeftError::MapMismatch(detail) => write!(f, "map/body mismatch: {detail}"),
            WeftError::Truncated => write!(f, "unexpected end of input (truncated WEFT)"),
            WeftError::EntityUnknown(name) => write!(f, "unknown entity reference &{name};"),
            WeftError::EntityInvalidCodepoint(cp) => {
                write!(f, "entity reference decoded to invalid codepoint U+{cp:04X}")
            }
            WeftError::AmpersandInTag => write!(f, "unescaped '&' inside tag markup"),
            WeftError::WordSyntax(detail) => write!(f, "invalid content word: {detail}"),
            WeftError::WoofSyntax(detail) => write!(f, "woof table syntax error: {detail}"),
            WeftError::WoofAmbiguous(a, b) => {
                write!(f, "woof table keys are ambiguous: \"{a}\" is a prefix of \"{b}\"")
            }
            WeftError::TableMissing(path) => write!(f, "table file not found: {path}"),
            WeftError::Arg(detail) => write!(f, "argument error: {detail}"),
            WeftError::Contract(detail) => write!(f, "internal contract violation: {detail}"),
            WeftError::HyphenPatterns(detail) => write!(f, "hyphenation pattern error: {detail}"),
        }
    }
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingError::InvalidUtf8 => write!(f, "input is not valid UTF-8"),
            EncodingError::StrayCarriageReturn => {
                write!(f, "a CR was not immediately followed by LF")
            }
            EncodingError::EmbeddedLineBreak => {
                write!(f, "a line or tuple element contained an embedded CR or LF")
            }
        }
    }
}

impl std::error::Error for WeftError {}

impl From<std::io::Error> for WeftError {
    fn from(e: std::io::Error) -> Self {
        WeftError::Io(e.to_string())
    }
}

pub type WeftResult<T> = Result<T, WeftError>;
