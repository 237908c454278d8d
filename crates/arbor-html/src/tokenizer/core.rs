use std::cell::RefCell;
use std::rc::Rc;

use arbor_fsm::{FsmError, Pattern, Schema, StateMachine, StateSpec, Transition};
use strum::IntoEnumIterator;

use super::actions::{
    self, Ctx, TokenizerData, append_attr_name, append_attr_value, append_end_tag_name,
    append_tag_name, append_text, begin_tag_name, defer, open_quote, open_unquoted,
    push_attribute, restore_deferred, start_element,
};
use super::states::{RawTextElement, TokenizerState};
use super::token::{EventKind, Token};
use crate::error::ParseError;

/// The type family of the HTML tokenizer's state machine.
pub struct HtmlSchema;

impl Schema for HtmlSchema {
    type Symbol = char;
    type State = TokenizerState;
    type Data = TokenizerData;
    type Event = Token;
}

type Spec = StateSpec<HtmlSchema>;
type Step = Transition<HtmlSchema>;

const QUOTES: [char; 2] = ['"', '\''];

fn alphanumeric() -> Pattern<char> {
    Pattern::Matching(char::is_ascii_alphanumeric)
}

fn whitespace() -> Pattern<char> {
    Pattern::Matching(char::is_ascii_whitespace)
}

fn attr_name_char(c: &char) -> bool {
    c.is_ascii_alphanumeric() || matches!(*c, '-' | '_' | ':' | '.')
}

/// A character-at-a-time HTML tokenizer.
///
/// Feed characters with [`HtmlTokenizer::dispatch`] and call
/// [`HtmlTokenizer::finish`] at end of input. Tokens are delivered to the
/// listeners registered with [`HtmlTokenizer::on`] as soon as they complete.
///
/// The accepted language is deliberately small: tags with attributes, text,
/// and the raw text elements `script` and `style`. There are no comments,
/// doctypes or character references; a `<!` sequence is plain text.
pub struct HtmlTokenizer {
    machine: StateMachine<HtmlSchema>,
}

impl HtmlTokenizer {
    /// A tokenizer in the `Text` state with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            machine: build_machine(),
        }
    }

    /// Register a listener for tokens of `kind`.
    pub fn on(&mut self, kind: EventKind, listener: impl FnMut(&Token) + 'static) {
        self.machine.on(kind, listener);
    }

    /// Feed one character.
    ///
    /// # Errors
    ///
    /// Returns [`FsmError::NoTransition`] if `c` cannot occur in the current
    /// state, for example `-` inside a tag name.
    pub fn dispatch(&mut self, c: char) -> Result<(), FsmError> {
        self.machine.dispatch(c)
    }

    /// Flush pending text at end of input.
    pub fn finish(&mut self) {
        self.machine.finish();
    }

    /// Back to the `Text` state with empty buffers. Listeners are kept.
    pub fn reset(&mut self) {
        self.machine.reset();
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> TokenizerState {
        *self.machine.current()
    }

    /// Tokenize a whole string.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] locating the first character the tokenizer
    /// rejected.
    pub fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
        let tokens = Rc::new(RefCell::new(Vec::new()));
        let mut tokenizer = Self::new();
        for kind in [
            EventKind::TextCreated,
            EventKind::ElementStarted,
            EventKind::ElementEnded,
        ] {
            let sink = Rc::clone(&tokens);
            tokenizer.on(kind, move |token| sink.borrow_mut().push(token.clone()));
        }

        let chars: Vec<char> = input.chars().collect();
        for (index, &c) in chars.iter().enumerate() {
            tokenizer
                .dispatch(c)
                .map_err(|source| ParseError::new(index, &chars, source))?;
        }
        tokenizer.finish();

        Ok(tokens.take())
    }
}

impl Default for HtmlTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

fn build_machine() -> StateMachine<HtmlSchema> {
    let mut machine = StateMachine::new(TokenizerState::Text)
        .state(TokenizerState::Text, text())
        .state(TokenizerState::TagStartOrEnd, tag_start_or_end())
        .state(TokenizerState::TagStart, tag_start())
        .state(TokenizerState::TagEnd, tag_end())
        .state(TokenizerState::AttrIdle, attr_idle())
        .state(TokenizerState::AttrName, attr_name())
        .state(TokenizerState::AttrIdleOrName, attr_idle_or_name())
        .state(TokenizerState::AttrEqual, attr_equal())
        .state(TokenizerState::AttrValue, attr_value())
        .finished(actions::finish);

    for element in RawTextElement::iter() {
        machine = raw_text_states(machine, element);
    }
    machine
}

fn text() -> Spec {
    Spec::new()
        .on(
            Pattern::Is('<'),
            Step::to(TokenizerState::TagStartOrEnd).with_action(defer),
        )
        .otherwise(Step::to(TokenizerState::Text).with_action(append_text))
}

fn tag_start_or_end() -> Spec {
    Spec::new()
        .on(
            Pattern::Is('/'),
            Step::to(TokenizerState::TagEnd).with_action(defer),
        )
        .on(
            alphanumeric(),
            Step::to(TokenizerState::TagStart).with_action(begin_tag_name),
        )
        .otherwise(Step::to(TokenizerState::Text).with_action(|c, ctx| {
            restore_deferred(c, ctx, TokenizerState::TagStartOrEnd);
        }))
}

fn tag_start() -> Spec {
    Spec::new()
        .on(
            alphanumeric(),
            Step::to(TokenizerState::TagStart).with_action(append_tag_name),
        )
        .on(whitespace(), Step::to(TokenizerState::AttrIdle))
        .on(Pattern::Is('/'), Step::to(TokenizerState::AttrIdle))
        .on(
            Pattern::Is('>'),
            Step::to(TokenizerState::Text).with_action(|_, ctx| start_element(ctx)),
        )
}

fn tag_end() -> Spec {
    Spec::new()
        .on(
            alphanumeric(),
            Step::to(TokenizerState::TagEnd).with_action(append_end_tag_name),
        )
        .on(
            Pattern::Is('>'),
            Step::to(TokenizerState::Text).with_action(|_, ctx| actions::end_element(ctx)),
        )
        .otherwise(Step::to(TokenizerState::Text).with_action(|c, ctx| {
            restore_deferred(c, ctx, TokenizerState::TagStartOrEnd);
        }))
}

fn attr_idle() -> Spec {
    Spec::new()
        .on(
            alphanumeric(),
            Step::to(TokenizerState::AttrName).with_action(append_attr_name),
        )
        .on(whitespace(), Step::to(TokenizerState::AttrIdle))
        .on(Pattern::Is('/'), Step::to(TokenizerState::AttrIdle))
        .on(
            Pattern::Is('>'),
            Step::to(TokenizerState::Text).with_action(|_, ctx| start_element(ctx)),
        )
}

fn attr_name() -> Spec {
    Spec::new()
        .on(
            Pattern::Matching(attr_name_char),
            Step::to(TokenizerState::AttrName).with_action(append_attr_name),
        )
        .on(whitespace(), Step::to(TokenizerState::AttrIdleOrName))
        .on(Pattern::Is('='), Step::to(TokenizerState::AttrEqual))
        .on(
            Pattern::Is('/'),
            Step::to(TokenizerState::AttrIdle).with_action(|_, ctx| push_attribute(ctx)),
        )
        .on(
            Pattern::Is('>'),
            Step::to(TokenizerState::Text).with_action(close_start_tag),
        )
}

fn attr_idle_or_name() -> Spec {
    Spec::new()
        .on(
            alphanumeric(),
            Step::to(TokenizerState::AttrName).with_action(|c, ctx| {
                push_attribute(ctx);
                append_attr_name(c, ctx);
            }),
        )
        .on(whitespace(), Step::to(TokenizerState::AttrIdleOrName))
        .on(Pattern::Is('='), Step::to(TokenizerState::AttrEqual))
        .on(
            Pattern::Is('/'),
            Step::to(TokenizerState::AttrIdle).with_action(|_, ctx| push_attribute(ctx)),
        )
        .on(
            Pattern::Is('>'),
            Step::to(TokenizerState::Text).with_action(close_start_tag),
        )
}

fn attr_equal() -> Spec {
    Spec::new()
        .on(whitespace(), Step::to(TokenizerState::AttrEqual))
        .on(
            Pattern::AnyOf(QUOTES.to_vec()),
            Step::to(TokenizerState::AttrValue).with_action(open_quote),
        )
        .on(
            Pattern::Is('>'),
            Step::to(TokenizerState::Text).with_action(close_start_tag),
        )
        .otherwise(Step::to(TokenizerState::AttrValue).with_action(open_unquoted))
}

fn attr_value() -> Spec {
    Spec::new()
        .on(
            whitespace(),
            Step::to(TokenizerState::AttrValue).with_action(|c, ctx| {
                if ctx.data().quote.is_some() {
                    append_attr_value(c, ctx);
                } else {
                    push_attribute(ctx);
                    ctx.to(TokenizerState::AttrIdle);
                }
            }),
        )
        .on(
            Pattern::Is('>'),
            Step::to(TokenizerState::Text).with_action(|c, ctx| {
                if ctx.data().quote.is_some() {
                    append_attr_value(c, ctx);
                    ctx.to(TokenizerState::AttrValue);
                } else {
                    close_start_tag(c, ctx);
                }
            }),
        )
        .otherwise(
            Step::to(TokenizerState::AttrValue).with_action(|c, ctx| {
                if ctx.data().quote == Some(c) {
                    push_attribute(ctx);
                    ctx.to(TokenizerState::AttrIdle);
                } else {
                    append_attr_value(c, ctx);
                }
            }),
        )
}

/// `>` right after an attribute name or value.
fn close_start_tag(_: char, ctx: &mut Ctx<'_>) {
    push_attribute(ctx);
    start_element(ctx);
}

/// The states for one raw text element: its content, then the stepwise match
/// of `</name>`.
///
/// The end tag name is matched ASCII case-insensitively. Any mismatch turns
/// the held-back characters into content and returns to the content state.
fn raw_text_states(
    machine: StateMachine<HtmlSchema>,
    element: RawTextElement,
) -> StateMachine<HtmlSchema> {
    let content = TokenizerState::RawText(element);
    let matched = move |n: usize| TokenizerState::RawTextEnd(element, n);
    let mismatch = move || {
        Step::to(content).with_action(move |c, ctx| restore_deferred(c, ctx, matched(0)))
    };

    let mut machine = machine
        .state(
            content,
            Spec::new()
                .on(Pattern::Is('<'), Step::to(matched(0)).with_action(defer))
                .otherwise(Step::to(content).with_action(append_text)),
        )
        .state(
            matched(0),
            Spec::new()
                .on(Pattern::Is('/'), Step::to(matched(1)).with_action(defer))
                .otherwise(mismatch()),
        );

    let name = element.name();
    for (i, c) in name.chars().enumerate() {
        machine = machine.state(
            matched(i + 1),
            Spec::new()
                .on(
                    Pattern::AnyOf(vec![c, c.to_ascii_uppercase()]),
                    Step::to(matched(i + 2)).with_action(defer),
                )
                .otherwise(mismatch()),
        );
    }

    machine.state(
        matched(name.len() + 1),
        Spec::new()
            .on(
                Pattern::Is('>'),
                Step::to(TokenizerState::Text)
                    .with_action(move |_, ctx| actions::end_raw_text(element, ctx)),
            )
            .otherwise(mismatch()),
    )
}
