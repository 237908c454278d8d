//! HTML tokenizer.
//!
//! A table-driven state machine over single characters, built on
//! [`arbor_fsm`]. Each completed piece of markup is reported as a [`Token`]
//! to listeners subscribed by [`EventKind`].

/// Transition actions and the tokenizer's working data.
pub mod actions;
/// The transition table and the tokenizer itself.
pub mod core;
/// Tokenizer states.
pub mod states;
/// Tokens and their kinds.
pub mod token;

pub use self::core::{HtmlSchema, HtmlTokenizer};
pub use actions::TokenizerData;
pub use states::{RawTextElement, TokenizerState};
pub use token::{EventKind, Token};
