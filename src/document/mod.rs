//! Document Model
//!
//! The element tree the validator walks. Parsing markup is not done here;
//! documents are built programmatically or loaded from a parser's JSON output.

pub mod json;
pub mod tree;

pub use tree::{AttributeSet, Document, Element, ElementId, PreOrder};
