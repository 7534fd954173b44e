//! Component C: the XML codepoint policy.
//!
//! A single predicate, [`is_valid`], decides whether a codepoint may appear in WEFT
//! output produced by the markup source. It rejects the C0 controls other than tab,
//! LF and CR, the C1 controls other than NEL (`U+0085`), the surrogate range (already
//! unrepresentable in a Rust `char`), the non-characters `U+FDD0..=U+FDEF`, and every
//! plane's trailing `..FFFE`/`..FFFF` pair.

/// True if `c` satisfies the XML-derived codepoint policy used to validate
/// entity-decoded character data.
pub fn is_valid(c: char) -> bool {
    let cp = c as u32;
    if cp < 0x20 && !matches!(cp, 0x09 | 0x0A | 0x0D) {
        return false;
    }
    if (0x7F..=0x9F).contains(&cp) && cp != 0x85 {
        return false;
    }
    if (0xFDD0..=0xFDEF).contains(&cp) {
        return false;
    }
    let low16 = cp & 0xFFFF;
    if low16 == 0xFFFE || low16 == 0xFFFF {
        return false;
    }
    true
}
