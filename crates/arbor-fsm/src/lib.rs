//! Generic finite state machine runtime.
//!
//! # Scope
//!
//! A machine is described by a table of named states. Each state maps input
//! symbols to [`Transition`]s through an ordered list of [`Pattern`]s, with an
//! optional `otherwise` fallback. A transition names its target state and may
//! carry an action that runs before the state changes.
//!
//! Actions see the machine through a [`Context`]:
//! - the single mutable data slot (read, replace, or copy-and-replace)
//! - `emit`, which synchronously forwards an event to listeners registered
//!   with [`StateMachine::on`]
//! - `to`, which overrides the transition's declared target
//!
//! The runtime carries no knowledge of what the symbols or events mean; the
//! HTML tokenizer in `arbor-html` is one table built on top of it.

/// Errors raised while dispatching symbols.
pub mod error;
/// The state machine, its transition tables, and the action context.
pub mod machine;

pub use error::FsmError;
pub use machine::{Action, Context, Event, Pattern, Schema, StateMachine, StateSpec, Transition};
