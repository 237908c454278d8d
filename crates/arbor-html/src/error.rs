use arbor_fsm::FsmError;
use thiserror::Error;

/// Characters kept on each side of the failing index in
/// [`ParseError::input_window`].
const WINDOW_RADIUS: usize = 20;

/// The tokenizer rejected a character.
///
/// Parsing stops at the first such character; there is no error recovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("state machine failed at index {index} in {input_window:?}")]
pub struct ParseError {
    /// Character (not byte) index of the rejected character.
    pub index: usize,
    /// Up to 40 characters of input around `index`, for display.
    pub input_window: String,
    /// Why the tokenizer rejected it.
    #[source]
    pub source: FsmError,
}

impl ParseError {
    /// Locate a failure at `index` within `input`.
    #[must_use]
    pub fn new(index: usize, input: &[char], source: FsmError) -> Self {
        let start = index.saturating_sub(WINDOW_RADIUS);
        let end = (start + 2 * WINDOW_RADIUS).min(input.len());
        Self {
            index,
            input_window: input[start.min(end)..end].iter().collect(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_transition() -> FsmError {
        FsmError::NoTransition {
            state: "TagStart".to_string(),
            symbol: "'-'".to_string(),
        }
    }

    #[test]
    fn test_window_is_clamped_to_input() {
        let input: Vec<char> = "<tag->".chars().collect();
        let err = ParseError::new(4, &input, no_transition());
        assert_eq!(err.index, 4);
        assert_eq!(err.input_window, "<tag->");
    }

    #[test]
    fn test_window_spans_forty_chars() {
        let input: Vec<char> = "x".repeat(100).chars().collect();
        let err = ParseError::new(50, &input, no_transition());
        assert_eq!(err.input_window.chars().count(), 40);
    }

    #[test]
    fn test_message_names_index() {
        let input: Vec<char> = "<tag->".chars().collect();
        let err = ParseError::new(4, &input, no_transition());
        assert_eq!(
            err.to_string(),
            "state machine failed at index 4 in \"<tag->\""
        );
    }
}
