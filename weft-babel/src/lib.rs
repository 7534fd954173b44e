//! `weft-babel`: everything that knows about a file format *other than* WEFT.
//!
//! This crate owns spec components G, H and L: the plain-text source, the
//! markup-aware source (the line-spanning XML/HTML tokenizer), and the unpack
//! and JSON targets. Every one of these builds or drains a WEFT container via
//! `weft-core`'s reader/writer; none of them reimplement framing, map
//! accounting, or any of the filters (I, J, K) that operate purely on an
//! already-built WEFT.

pub mod markup;
pub mod plain_text;
pub mod targets;

pub use markup::{Location, MarkupTokenizer};
