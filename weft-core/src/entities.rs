//! Component B: the named-entity table.
//!
//! Spec 4.C describes the production of this table as an external, one-shot build
//! step (a JSON-to-static-table compiler) that is explicitly out of scope (spec 1,
//! "Deliberately out of scope"). What's in scope is the *shape* the markup source
//! consumes: a case-sensitive `name -> codepoint sequence` map, distributed as the
//! compact text form spec 4.C names — `name=hex1,hex2,...` sorted by name, one entry
//! per line, semicolon-terminated aliases already resolved away.
//!
//! The table embedded here is a curated seed covering the entities the test corpus
//! and common prose exercise (see `DESIGN.md` for why a full ~2200-row HTML5 table
//! isn't vendored). Any entity name absent from this table is reported as
//! [`crate::error::WeftError::EntityUnknown`] by the caller, exactly as it would be
//! for a name genuinely absent from the full table.

use once_cell::sync::Lazy;
use std::collections::HashMap;

const ENTITY_TABLE_SRC: &str = include_str!("../data/entities.txt");

static ENTITY_TABLE: Lazy<HashMap<&'static str, Vec<char>>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for line in ENTITY_TABLE_SRC.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (name, hexes) = line
            .split_once('=')
            .unwrap_or_else(|| panic!("malformed entity table line: {line:?}"));
        let codepoints: Vec<char> = hexes
            .split(',')
            .map(|h| {
                let cp = u32::from_str_radix(h, 16)
                    .unwrap_or_else(|_| panic!("bad hex codepoint {h:?} for entity {name:?}"));
                char::from_u32(cp)
                    .unwrap_or_else(|| panic!("entity {name:?} names an invalid codepoint {cp:x}"))
            })
            .collect();
        map.insert(name, codepoints);
    }
    map
});

/// Look up a named entity (without the leading `&` or trailing `;`). Lookup
/// is case-sensitive, per spec 4.H.
pub fn lookup(name: &str) -> Option<&'static [char]> {
    ENTITY_TABLE.get(name).map(|v| v.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_amp_lt_gt_apos_quot() {
        assert_eq!(lookup("amp"), Some(&['&'][..]));
        assert_eq!(lookup("lt"), Some(&['<'][..]));
        assert_eq!(lookup("gt"), Some(&['>'][..]));
        assert_eq!(lookup("apos"), Some(&['\''][..]));
        assert_eq!(lookup("quot"), Some(&['"'][..]));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(lookup("AMP").is_none());
        assert!(lookup("Amp").is_none());
    }

    #[test]
    fn unknown_name_is_none() {
        assert!(lookup("notarealentity").is_none());
    }

    #[test]
    fn nbsp_and_accented_letters_resolve() {
        assert_eq!(lookup("nbsp"), Some(&['\u{00A0}'][..]));
        assert_eq!(lookup("eacute"), Some(&['\u{00E9}'][..]));
    }

    #[test]
    fn table_has_no_duplicate_or_empty_entries() {
        assert!(!ENTITY_TABLE.is_empty());
        for (name, codepoints) in ENTITY_TABLE.iter() {
            assert!(!name.is_empty());
            assert!(!codepoints.is_empty());
        }
    }
}
