use thiserror::Error;

/// A failure to advance the machine.
///
/// State and symbol are rendered with their `Debug` form so the error does not
/// carry the machine's type parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsmError {
    /// The current state has neither a matching transition nor an `otherwise`.
    #[error("no transition for symbol {symbol} in state {state}")]
    NoTransition {
        /// The state the machine was in.
        state: String,
        /// The symbol that could not be dispatched.
        symbol: String,
    },

    /// A transition (declared or overridden by an action) targets a state
    /// that is not part of the table, or the machine sits in such a state.
    #[error("there is no state named {state} in the state machine")]
    UnknownState {
        /// The unresolved state.
        state: String,
    },
}
