//! HTML tokenizer and tree builder for the arbor toolkit.
//!
//! # Scope
//!
//! This crate implements a deliberately small HTML dialect:
//! - **Tokenizer**: a character-level state machine built on [`arbor_fsm`].
//!   It recognizes start tags with attributes (quoted, unquoted or bare), end
//!   tags, text, and the raw text elements `script` and `style`.
//! - **Tree builder**: turns tokens into an [`arbor_dom::DomTree`], closing
//!   elements implicitly when an outer end tag arrives, and runs caller hooks
//!   as each node is created or closed.
//!
//! # Not Supported
//!
//! - Comments, doctypes and CDATA (a `<!` sequence is kept as text)
//! - Character references (text and attribute values are verbatim)
//! - Insertion modes, foster parenting, the adoption agency algorithm
//! - Error recovery inside tags: the first rejected character ends parsing
//!   with a [`ParseError`]

/// Tokenizer failures.
pub mod error;
/// Tree construction.
pub mod parser;
/// The character-level tokenizer.
pub mod tokenizer;

pub use error::ParseError;
pub use parser::{HtmlParser, NodeHook, ParseIssue, format_tree, parse, print_tree};
pub use tokenizer::{EventKind, HtmlTokenizer, Token};
