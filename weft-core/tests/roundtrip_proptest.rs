//! Property-based coverage for the container format's universal invariants:
//! writing a line tuple and reading it back must reproduce it exactly, and
//! the word splitter must be idempotent once applied.

use proptest::prelude::*;
use weft_core::reader::WeftReader;
use weft_core::word_splitter::split_line;
use weft_core::writer::WeftWriter;
use weft_core::LineTuple;

/// A content word: non-empty, no CR/LF (tuple grammar forbids both).
fn word_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9,.!?;:'\"()-]{1,12}"
}

/// A skip string: may be empty, only ever holds the whitespace a source
/// would have captured between words.
fn skip_strategy() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), " {1,4}", "\t{1,2}", "  \t ",]
}

/// A full odd-length tuple: skip, (word, skip)*.
fn tuple_strategy() -> impl Strategy<Value = LineTuple> {
    prop::collection::vec((word_strategy(), skip_strategy()), 0..6).prop_flat_map(|pairs| {
        skip_strategy().prop_map(move |leading| {
            let mut tuple = vec![leading];
            for (word, skip) in &pairs {
                tuple.push(word.clone());
                tuple.push(skip.clone());
            }
            tuple
        })
    })
}

fn lines_strategy() -> impl Strategy<Value = Vec<LineTuple>> {
    prop::collection::vec(tuple_strategy(), 0..8)
}

proptest! {
    #[test]
    fn write_then_read_reproduces_every_tuple(lines in lines_strategy()) {
        let mut writer = WeftWriter::new().unwrap();
        for line in &lines {
            writer.write_line(line).unwrap();
        }
        let mut out = Vec::new();
        writer.close(&mut out).unwrap();

        let mut reader = WeftReader::new(out.as_slice()).unwrap();
        prop_assert_eq!(reader.line_count(), lines.len());
        for expected in &lines {
            let actual = reader.read_line().unwrap();
            prop_assert_eq!(actual.as_ref(), Some(expected));
        }
        prop_assert_eq!(reader.read_line().unwrap(), None);
    }

    #[test]
    fn splitting_an_already_split_line_changes_nothing(tuple in tuple_strategy()) {
        let once = split_line(&tuple);
        let twice = split_line(&once);
        prop_assert_eq!(once, twice);
    }
}
