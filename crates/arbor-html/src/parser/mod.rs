//! Tree construction on top of the tokenizer.

/// The tree builder and parser entry points.
pub mod core;

pub use self::core::{HtmlParser, NodeHook, ParseIssue, format_tree, parse, print_tree};
