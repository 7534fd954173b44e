//! Round-trip identity (spec 8, property 1): packaging plain text as a WEFT
//! and unpacking it must reproduce the original text exactly.

use proptest::prelude::*;
use weft_babel::{plain_text, targets};

fn plain_text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-zA-Z0-9 \t]{0,10}", 0..6).prop_map(|lines| lines.join("\n"))
}

proptest! {
    #[test]
    fn source_then_unpack_reproduces_the_original_text(text in plain_text_strategy()) {
        let mut weft = Vec::new();
        plain_text::source(text.as_bytes(), &mut weft).unwrap();

        let mut restored = Vec::new();
        targets::unpack(weft.as_slice(), &mut restored).unwrap();

        prop_assert_eq!(String::from_utf8(restored).unwrap(), text);
    }
}
