use arbor_dom::Attr;
use arbor_fsm::Event;
use strum_macros::{Display, EnumString};

/// What the tokenizer reports to the tree builder.
///
/// Tag names are carried upper-cased; attribute names and values are exactly
/// as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A run of character data between tags, or the body of a raw text
    /// element. Never empty.
    TextCreated {
        /// The text, verbatim. No entity decoding is applied.
        text: String,
    },

    /// A start tag was completed.
    ElementStarted {
        /// Upper-cased tag name.
        tag_name: String,
        /// Attributes in source order. Duplicates are kept.
        attributes: Vec<Attr>,
    },

    /// An end tag was completed, or a void element was started.
    ElementEnded {
        /// Upper-cased tag name.
        tag_name: String,
    },
}

/// The kinds of [`Token`], used to subscribe to one kind at a time.
///
/// The string forms (`textCreated`, `elementStarted`, `elementEnded`) are the
/// names used in pipeline configuration and CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "camelCase")]
pub enum EventKind {
    /// See [`Token::TextCreated`].
    TextCreated,
    /// See [`Token::ElementStarted`].
    ElementStarted,
    /// See [`Token::ElementEnded`].
    ElementEnded,
}

impl Event for Token {
    type Kind = EventKind;

    fn kind(&self) -> EventKind {
        match self {
            Self::TextCreated { .. } => EventKind::TextCreated,
            Self::ElementStarted { .. } => EventKind::ElementStarted,
            Self::ElementEnded { .. } => EventKind::ElementEnded,
        }
    }
}
