//! Actions attached to the tokenizer's transitions.
//!
//! Each action reads and rewrites [`TokenizerData`] through the machine's
//! [`Context`] and may emit a [`Token`]. Nothing here decides the next state
//! except where noted; the transition table does that.

use std::mem;

use arbor_dom::{Attr, is_void_element};
use arbor_fsm::Context;

use super::core::HtmlSchema;
use super::states::{RawTextElement, TokenizerState};
use super::token::Token;

pub(super) type Ctx<'a> = Context<'a, HtmlSchema>;

/// Everything the tokenizer accumulates between emitted tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizerData {
    /// Start tag name as written.
    pub tag_name: String,
    /// Attribute name being read.
    pub attr_name: String,
    /// Attribute value being read.
    pub attr_value: String,
    /// The quote that opened the current value; `None` when unquoted.
    pub quote: Option<char>,
    /// Attributes completed so far on the current start tag.
    pub attributes: Vec<Attr>,
    /// End tag name being read.
    pub end_tag_name: String,
    /// Character data not yet emitted.
    pub text: String,
    /// Characters held back while a tag might be starting. They become text
    /// if it turns out not to be one.
    pub deferred: String,
}

pub(super) fn append_text(c: char, ctx: &mut Ctx<'_>) {
    ctx.update(|mut data| {
        data.text.push(c);
        data
    });
}

pub(super) fn defer(c: char, ctx: &mut Ctx<'_>) {
    ctx.update(|mut data| {
        data.deferred.push(c);
        data
    });
}

pub(super) fn append_tag_name(c: char, ctx: &mut Ctx<'_>) {
    ctx.update(|mut data| {
        data.tag_name.push(c);
        data
    });
}

pub(super) fn append_end_tag_name(c: char, ctx: &mut Ctx<'_>) {
    ctx.update(|mut data| {
        data.deferred.push(c);
        data.end_tag_name.push(c);
        data
    });
}

pub(super) fn append_attr_name(c: char, ctx: &mut Ctx<'_>) {
    ctx.update(|mut data| {
        data.attr_name.push(c);
        data
    });
}

pub(super) fn append_attr_value(c: char, ctx: &mut Ctx<'_>) {
    ctx.update(|mut data| {
        data.attr_value.push(c);
        data
    });
}

/// Open a quoted value.
pub(super) fn open_quote(c: char, ctx: &mut Ctx<'_>) {
    ctx.update(|mut data| {
        data.quote = Some(c);
        data.attr_value.clear();
        data
    });
}

/// Start an unquoted value with `c`.
pub(super) fn open_unquoted(c: char, ctx: &mut Ctx<'_>) {
    ctx.update(|mut data| {
        data.quote = None;
        data.attr_value = c.to_string();
        data
    });
}

/// The held-back characters were not a tag after all: they, and `c`, become
/// text.
///
/// If `c` is itself a `<`, it may open the tag the previous one did not, so
/// it is held back instead and the machine goes to `retry`.
pub(super) fn restore_deferred(c: char, ctx: &mut Ctx<'_>, retry: TokenizerState) {
    ctx.update(|mut data| {
        let deferred = mem::take(&mut data.deferred);
        data.text.push_str(&deferred);
        data.end_tag_name.clear();
        if c == '<' {
            data.deferred.push(c);
        } else {
            data.text.push(c);
        }
        data
    });
    if c == '<' {
        ctx.to(retry);
    }
}

/// Emit the pending text, if any, and drop the held-back characters.
pub(super) fn flush_text(ctx: &mut Ctx<'_>) {
    let mut text = String::new();
    ctx.update(|mut data| {
        text = mem::take(&mut data.text);
        data.deferred.clear();
        data
    });
    if !text.is_empty() {
        ctx.emit(Token::TextCreated { text });
    }
}

/// The first character of a start tag name ends the text before it.
pub(super) fn begin_tag_name(c: char, ctx: &mut Ctx<'_>) {
    flush_text(ctx);
    append_tag_name(c, ctx);
}

/// Move the attribute being read onto the tag's list.
pub(super) fn push_attribute(ctx: &mut Ctx<'_>) {
    ctx.update(|mut data| {
        let name = mem::take(&mut data.attr_name);
        let value = mem::take(&mut data.attr_value);
        data.quote = None;
        if !name.is_empty() {
            data.attributes.push(Attr::new(name, value));
        }
        data
    });
}

/// `>` closed a start tag.
///
/// Emits `ElementStarted`, and `ElementEnded` straight after it for a void
/// element. A `script` or `style` start tag switches the machine to raw text.
pub(super) fn start_element(ctx: &mut Ctx<'_>) {
    let mut tag_name = String::new();
    let mut attributes = Vec::new();
    ctx.update(|mut data| {
        tag_name = mem::take(&mut data.tag_name);
        attributes = mem::take(&mut data.attributes);
        TokenizerData::default()
    });
    if let Some(element) = RawTextElement::from_tag(&tag_name) {
        ctx.to(TokenizerState::RawText(element));
    }

    let tag_name = tag_name.to_ascii_uppercase();
    let void = is_void_element(&tag_name);
    ctx.emit(Token::ElementStarted {
        tag_name: tag_name.clone(),
        attributes,
    });
    if void {
        ctx.emit(Token::ElementEnded { tag_name });
    }
}

/// `>` closed an end tag: flush the text before it, then report the end.
pub(super) fn end_element(ctx: &mut Ctx<'_>) {
    flush_text(ctx);
    let mut tag_name = String::new();
    ctx.update(|mut data| {
        tag_name = mem::take(&mut data.end_tag_name);
        TokenizerData::default()
    });
    if !tag_name.is_empty() {
        ctx.emit(Token::ElementEnded {
            tag_name: tag_name.to_ascii_uppercase(),
        });
    }
}

/// `</name>` closed a raw text element. The element's content is emitted as
/// one text token; the held-back end tag is dropped.
pub(super) fn end_raw_text(element: RawTextElement, ctx: &mut Ctx<'_>) {
    flush_text(ctx);
    ctx.set_data(TokenizerData::default());
    ctx.emit(Token::ElementEnded {
        tag_name: element.name().to_ascii_uppercase(),
    });
}

/// End of input: whatever text is pending, held-back characters included,
/// is emitted.
pub(super) fn finish(ctx: &mut Ctx<'_>) {
    let mut text = String::new();
    ctx.update(|mut data| {
        text = mem::take(&mut data.text);
        text.push_str(&data.deferred);
        TokenizerData::default()
    });
    if !text.is_empty() {
        ctx.emit(Token::TextCreated { text });
    }
}
