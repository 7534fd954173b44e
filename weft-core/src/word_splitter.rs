//! Component I: the word splitter.
//!
//! Splits each content word of a WEFT line into alternating non-linguistic prefixes
//! and linguistic subwords. A linguistic subword is a maximal run of Unicode
//! category `L` or `M` codepoints, optionally including an apostrophe (`U+0027`) or
//! right single quote (`U+2019`) when both its immediate neighbours in the original
//! word are themselves `L`/`M` — spec 4.I's contextual-apostrophe rule, implemented
//! here by provisionally swapping qualifying apostrophes for private-use sentinels
//! before the run-walk, then restoring them afterward so the walk itself only has
//! to ask "is this codepoint L or M".

use crate::LineTuple;
use unicode_general_category::{get_general_category, GeneralCategory};

const APOSTROPHE: char = '\u{0027}';
const RIGHT_SINGLE_QUOTE: char = '\u{2019}';
const APOSTROPHE_SENTINEL: char = '\u{E000}';
const RIGHT_SINGLE_QUOTE_SENTINEL: char = '\u{E001}';

fn is_letter_or_mark(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::NonspacingMark
            | GeneralCategory::SpacingMark
            | GeneralCategory::EnclosingMark
    )
}

/// Split a single content word into its alternating (non-linguistic, linguistic)
/// pieces. Returns the pieces in order; an empty leading or trailing piece is
/// simply omitted (the caller interleaves empty skip strings between adjacent
/// non-empty pieces to preserve tuple alternation).
pub fn split_word(word: &str) -> Vec<String> {
    let original: Vec<char> = word.chars().collect();
    let sentineled: Vec<char> = original
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            if (c == APOSTROPHE || c == RIGHT_SINGLE_QUOTE)
                && i > 0
                && i + 1 < original.len()
                && is_letter_or_mark(original[i - 1])
                && is_letter_or_mark(original[i + 1])
            {
                if c == APOSTROPHE {
                    APOSTROPHE_SENTINEL
                } else {
                    RIGHT_SINGLE_QUOTE_SENTINEL
                }
            } else {
                c
            }
        })
        .collect();

    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_is_letter: Option<bool> = None;

    for (i, &sc) in sentineled.iter().enumerate() {
        let is_letter =
            sc == APOSTROPHE_SENTINEL || sc == RIGHT_SINGLE_QUOTE_SENTINEL || is_letter_or_mark(sc);
        let restored = match sc {
            APOSTROPHE_SENTINEL => APOSTROPHE,
            RIGHT_SINGLE_QUOTE_SENTINEL => RIGHT_SINGLE_QUOTE,
            other => other,
        };
        debug_assert_eq!(restored, original[i]);

        if current_is_letter == Some(is_letter) {
            current.push(restored);
        } else {
            if !current.is_empty() {
                pieces.push(current.clone());
            }
            current = String::from(restored);
            current_is_letter = Some(is_letter);
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Expand one content word's split pieces into the tuple fragment that
/// replaces it: an empty skip string is inserted between adjacent non-empty
/// pieces so the fragment still alternates (skip, word, skip, ..., skip).
fn expand(word: &str) -> Vec<String> {
    let pieces = split_word(word);
    if pieces.is_empty() {
        return vec![String::new()];
    }
    let mut out = Vec::with_capacity(pieces.len() * 2 - 1);
    for (i, piece) in pieces.into_iter().enumerate() {
        if i > 0 {
            out.push(String::new());
        }
        out.push(piece);
    }
    out
}

/// Rebuild a line's tuple, substituting every content word with its split
/// expansion. The skip strings are preserved verbatim; only the odd-indexed
/// (word) elements are touched.
pub fn split_line(tuple: &LineTuple) -> LineTuple {
    if tuple.len() == 1 {
        return tuple.clone();
    }
    let mut out = Vec::new();
    out.push(tuple[0].clone());
    for pair in tuple[1..].chunks(2) {
        let word = &pair[0];
        out.extend(expand(word));
        if let Some(skip) = pair.get(1) {
            out.push(skip.clone());
        }
    }
    out
}
