use thiserror::Error;

/// A selector string that does not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid selector {selector:?} at offset {offset}: {message}")]
pub struct SelectorParseError {
    /// The selector as given.
    pub selector: String,
    /// Character offset of the problem.
    pub offset: usize,
    /// What is wrong there.
    pub message: String,
}

impl SelectorParseError {
    pub(crate) fn new(selector: &str, offset: usize, message: impl Into<String>) -> Self {
        Self {
            selector: selector.to_string(),
            offset,
            message: message.into(),
        }
    }
}

/// Errors from parsing or evaluating a selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// The selector is malformed.
    #[error(transparent)]
    Parse(#[from] SelectorParseError),

    /// The selector uses an attribute operator with no matching rule.
    #[error("attribute operator {operator} in [{name}{operator}...] is not supported")]
    UnsupportedOperator {
        /// The operator as written, e.g. `~=`.
        operator: &'static str,
        /// The attribute it was applied to.
        name: String,
    },
}
