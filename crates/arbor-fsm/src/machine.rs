use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use crate::error::FsmError;

/// The type family a machine is built over.
///
/// Grouping the associated types keeps signatures like
/// `Transition<S>` readable instead of carrying four parameters everywhere.
pub trait Schema: 'static {
    /// One unit of input, e.g. a `char`.
    type Symbol: Copy + PartialEq + Debug;
    /// State names. Raw strings, enums, or enums with payloads all work.
    type State: Clone + Eq + Hash + Debug;
    /// The single mutable value shared by all actions.
    type Data: Clone + Default;
    /// Values emitted by actions to registered listeners.
    type Event: Event;
}

/// An event emitted through [`Context::emit`].
///
/// Listeners subscribe per kind, so every event reports which kind it is.
pub trait Event {
    /// Discriminant listeners subscribe to.
    type Kind: Copy + Eq + Hash + Debug;

    /// The kind of this event.
    fn kind(&self) -> Self::Kind;
}

/// Matches input symbols for one row of a state's transition table.
pub enum Pattern<T> {
    /// Exactly this symbol.
    Is(T),
    /// Any symbol from the list.
    AnyOf(Vec<T>),
    /// Any symbol accepted by the predicate. Character classes such as
    /// `char::is_ascii_alphanumeric` fit here directly.
    Matching(fn(&T) -> bool),
}

impl<T: PartialEq> Pattern<T> {
    /// Whether `symbol` is accepted by this pattern.
    pub fn accepts(&self, symbol: &T) -> bool {
        match self {
            Self::Is(expected) => expected == symbol,
            Self::AnyOf(candidates) => candidates.contains(symbol),
            Self::Matching(predicate) => predicate(symbol),
        }
    }
}

/// Work run by a transition before the machine changes state.
pub type Action<S> = Rc<dyn Fn(<S as Schema>::Symbol, &mut Context<'_, S>)>;

type FinishedHandler<S> = Rc<dyn Fn(&mut Context<'_, S>)>;

type Listener<S> = Box<dyn FnMut(&<S as Schema>::Event)>;

type Listeners<S> = HashMap<<<S as Schema>::Event as Event>::Kind, Vec<Listener<S>>>;

/// A target state plus an optional action.
pub struct Transition<S: Schema> {
    to: S::State,
    action: Option<Action<S>>,
}

impl<S: Schema> Transition<S> {
    /// A transition to `state` with no action.
    #[must_use]
    pub fn to(state: S::State) -> Self {
        Self {
            to: state,
            action: None,
        }
    }

    /// Attach the action run before the state changes.
    #[must_use]
    pub fn with_action(mut self, action: impl Fn(S::Symbol, &mut Context<'_, S>) + 'static) -> Self {
        self.action = Some(Rc::new(action));
        self
    }

    /// The declared target state.
    pub fn target(&self) -> &S::State {
        &self.to
    }
}

impl<S: Schema> Clone for Transition<S> {
    fn clone(&self) -> Self {
        Self {
            to: self.to.clone(),
            action: self.action.clone(),
        }
    }
}

/// The transition table of one state.
///
/// Rows are tried in insertion order; the first accepting pattern wins.
pub struct StateSpec<S: Schema> {
    rows: Vec<(Pattern<S::Symbol>, Transition<S>)>,
    otherwise: Option<Transition<S>>,
}

impl<S: Schema> StateSpec<S> {
    /// An empty table: every symbol fails until rows are added.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: Vec::new(),
            otherwise: None,
        }
    }

    /// Add a row.
    #[must_use]
    pub fn on(mut self, pattern: Pattern<S::Symbol>, transition: Transition<S>) -> Self {
        self.rows.push((pattern, transition));
        self
    }

    /// Set the fallback used when no row accepts the symbol.
    #[must_use]
    pub fn otherwise(mut self, transition: Transition<S>) -> Self {
        self.otherwise = Some(transition);
        self
    }

    fn resolve(&self, symbol: &S::Symbol) -> Option<&Transition<S>> {
        self.rows
            .iter()
            .find(|(pattern, _)| pattern.accepts(symbol))
            .map(|(_, transition)| transition)
            .or(self.otherwise.as_ref())
    }
}

impl<S: Schema> Default for StateSpec<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// The view of the machine handed to actions and to the `finished` handler.
pub struct Context<'a, S: Schema> {
    data: &'a mut S::Data,
    target: Option<S::State>,
    listeners: &'a mut Listeners<S>,
}

impl<S: Schema> Context<'_, S> {
    /// The current data value.
    pub fn data(&self) -> &S::Data {
        self.data
    }

    /// Replace the data value.
    pub fn set_data(&mut self, data: S::Data) {
        *self.data = data;
    }

    /// Replace the data value with `f(current)`.
    ///
    /// The function receives the value by ownership and returns its
    /// replacement; the slot is only written once, after `f` returns.
    pub fn update(&mut self, f: impl FnOnce(S::Data) -> S::Data) {
        let current = std::mem::take(self.data);
        *self.data = f(current);
    }

    /// Forward `event` synchronously to every listener of its kind.
    pub fn emit(&mut self, event: S::Event) {
        if let Some(listeners) = self.listeners.get_mut(&event.kind()) {
            for listener in listeners {
                listener(&event);
            }
        }
    }

    /// Override the running transition's target state.
    pub fn to(&mut self, state: S::State) {
        self.target = Some(state);
    }
}

/// A table-driven state machine.
///
/// Built once from a table; [`StateMachine::reset`] returns it to the initial
/// state with a fresh copy of the initial data. Listeners survive resets.
pub struct StateMachine<S: Schema> {
    states: HashMap<S::State, StateSpec<S>>,
    initial_state: S::State,
    initial_data: S::Data,
    finished: Option<FinishedHandler<S>>,
    current: S::State,
    data: S::Data,
    listeners: Listeners<S>,
}

impl<S: Schema> StateMachine<S> {
    /// A machine with no states, starting in `initial_state` with the default data.
    #[must_use]
    pub fn new(initial_state: S::State) -> Self {
        Self::with_data(initial_state, S::Data::default())
    }

    /// A machine with no states, starting in `initial_state` with `initial_data`.
    #[must_use]
    pub fn with_data(initial_state: S::State, initial_data: S::Data) -> Self {
        Self {
            states: HashMap::new(),
            current: initial_state.clone(),
            initial_state,
            data: initial_data.clone(),
            initial_data,
            finished: None,
            listeners: HashMap::new(),
        }
    }

    /// Add (or replace) the table for `name`.
    #[must_use]
    pub fn state(mut self, name: S::State, spec: StateSpec<S>) -> Self {
        let _ = self.states.insert(name, spec);
        self
    }

    /// Set the handler run by [`StateMachine::finish`].
    #[must_use]
    pub fn finished(mut self, handler: impl Fn(&mut Context<'_, S>) + 'static) -> Self {
        self.finished = Some(Rc::new(handler));
        self
    }

    /// The state the machine is in.
    pub fn current(&self) -> &S::State {
        &self.current
    }

    /// The current data value.
    pub fn data(&self) -> &S::Data {
        &self.data
    }

    /// Register a listener for events of `kind`.
    pub fn on(&mut self, kind: <S::Event as Event>::Kind, listener: impl FnMut(&S::Event) + 'static) {
        self.listeners
            .entry(kind)
            .or_default()
            .push(Box::new(listener));
    }

    /// Feed one symbol.
    ///
    /// Resolves the transition (matching row, else `otherwise`), runs its
    /// action, then moves to the action's override target if one was set,
    /// otherwise to the declared target.
    ///
    /// # Errors
    ///
    /// - [`FsmError::UnknownState`] if the current state or the resolved target
    ///   is not in the table. The machine stays in its current state, but the
    ///   target is only known once the action has run: data the action wrote
    ///   and events it emitted are not rolled back.
    /// - [`FsmError::NoTransition`] if nothing accepts `symbol`.
    pub fn dispatch(&mut self, symbol: S::Symbol) -> Result<(), FsmError> {
        let spec = self
            .states
            .get(&self.current)
            .ok_or_else(|| FsmError::UnknownState {
                state: format!("{:?}", self.current),
            })?;
        let transition = spec
            .resolve(&symbol)
            .ok_or_else(|| FsmError::NoTransition {
                state: format!("{:?}", self.current),
                symbol: format!("{symbol:?}"),
            })?;

        let mut context = Context {
            data: &mut self.data,
            target: None,
            listeners: &mut self.listeners,
        };
        if let Some(action) = &transition.action {
            action(symbol, &mut context);
        }
        let next = context
            .target
            .take()
            .unwrap_or_else(|| transition.to.clone());

        if !self.states.contains_key(&next) {
            return Err(FsmError::UnknownState {
                state: format!("{next:?}"),
            });
        }
        self.current = next;
        Ok(())
    }

    /// Run the `finished` handler, if any.
    ///
    /// End of input has no symbol of its own; this is where buffered data
    /// gets flushed.
    pub fn finish(&mut self) {
        if let Some(handler) = self.finished.clone() {
            let mut context = Context {
                data: &mut self.data,
                target: None,
                listeners: &mut self.listeners,
            };
            handler(&mut context);
        }
    }

    /// Return to the initial state with a fresh copy of the initial data.
    pub fn reset(&mut self) {
        self.current = self.initial_state.clone();
        self.data = self.initial_data.clone();
    }
}
