//! Splits a selector string into tokens.
//!
//! Attribute selectors are lexed whole, because their values follow
//! different rules (quoting, arbitrary characters) from the rest of the
//! selector.

use super::AttributeSelector;
use crate::error::SelectorParseError;

/// One lexical unit of a selector, tagged with its character offset by
/// [`tokenize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// An identifier in type position, as written.
    Ident(String),
    /// `*`
    Universal,
    /// `.name`
    Class(String),
    /// `#name`
    Id(String),
    /// `[...]`
    Attribute(AttributeSelector),
    /// A run of whitespace.
    Whitespace,
    /// `>`
    Child,
}

/// A position in the selector being lexed.
pub(crate) struct Cursor<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    pub(crate) fn offset(&self) -> usize {
        self.pos
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    pub(crate) fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    /// Consume `expected` if it is next.
    pub(crate) fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.peek().filter(|&c| accept(c)) {
            out.push(c);
            self.pos += 1;
        }
        out
    }

    /// Skip whitespace; reports whether there was any.
    pub(crate) fn skip_whitespace(&mut self) -> bool {
        !self.eat_while(|c| c.is_ascii_whitespace()).is_empty()
    }

    pub(crate) fn error(&self, offset: usize, message: impl Into<String>) -> SelectorParseError {
        SelectorParseError::new(self.source, offset, message)
    }
}

/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

const fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// Tokenize `selector`, pairing each token with its starting offset.
///
/// # Errors
///
/// Returns a [`SelectorParseError`] for characters outside the supported
/// syntax and for malformed attribute selectors.
pub fn tokenize(selector: &str) -> Result<Vec<(usize, Token)>, SelectorParseError> {
    let mut cursor = Cursor::new(selector);
    let mut tokens = Vec::new();

    while let Some(c) = cursor.peek() {
        let start = cursor.offset();
        let token = match c {
            '.' | '#' => {
                let _ = cursor.bump();
                let name = cursor.eat_while(is_ident_char);
                if name.is_empty() {
                    return Err(cursor.error(start, format!("expected a name after '{c}'")));
                }
                if c == '.' {
                    Token::Class(name)
                } else {
                    Token::Id(name)
                }
            }
            '*' => {
                let _ = cursor.bump();
                Token::Universal
            }
            '>' => {
                let _ = cursor.bump();
                Token::Child
            }
            '[' => {
                let _ = cursor.bump();
                Token::Attribute(attribute(&mut cursor, start)?)
            }
            c if c.is_ascii_whitespace() => {
                let _ = cursor.skip_whitespace();
                Token::Whitespace
            }
            c if is_ident_char(c) => Token::Ident(cursor.eat_while(is_ident_char)),
            c => return Err(cursor.error(start, format!("unexpected '{c}'"))),
        };
        tokens.push((start, token));
    }

    Ok(tokens)
}

/// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// Lex the rest of an attribute selector; the cursor is just past `[`.
fn attribute(cursor: &mut Cursor<'_>, start: usize) -> Result<AttributeSelector, SelectorParseError> {
    let _ = cursor.skip_whitespace();
    let name = cursor.eat_while(is_ident_char);
    if name.is_empty() {
        return Err(cursor.error(cursor.offset(), "attribute selector has no name"));
    }
    let _ = cursor.skip_whitespace();

    let operator_at = cursor.offset();
    let operator = match cursor.bump() {
        Some(']') => return Ok(AttributeSelector::Exists(name)),
        Some('=') => '=',
        Some(op @ ('^' | '*' | '$' | '~' | '|')) => {
            if !cursor.eat('=') {
                return Err(cursor.error(operator_at, format!("expected '=' after '{op}'")));
            }
            op
        }
        Some(other) => {
            return Err(cursor.error(
                operator_at,
                format!("unexpected '{other}' in attribute selector"),
            ));
        }
        None => return Err(cursor.error(start, "unterminated attribute selector")),
    };

    let _ = cursor.skip_whitespace();
    let value = attribute_value(cursor)?;
    let _ = cursor.skip_whitespace();
    let close_at = cursor.offset();
    match cursor.bump() {
        Some(']') => {}
        Some(other) => {
            return Err(cursor.error(close_at, format!("expected ']' but found '{other}'")));
        }
        None => return Err(cursor.error(start, "unterminated attribute selector")),
    }

    Ok(match operator {
        '^' => AttributeSelector::PrefixMatch(name, value),
        '*' => AttributeSelector::SubstringMatch(name, value),
        '$' => AttributeSelector::SuffixMatch(name, value),
        '~' => AttributeSelector::Includes(name, value),
        '|' => AttributeSelector::DashMatch(name, value),
        _ => AttributeSelector::Equals(name, value),
    })
}

/// A quoted value must close with the quote that opened it. A bare value
/// runs up to whitespace or `]` and may not contain quotes.
fn attribute_value(cursor: &mut Cursor<'_>) -> Result<String, SelectorParseError> {
    let start = cursor.offset();
    match cursor.peek() {
        Some(quote) if is_quote(quote) => {
            let _ = cursor.bump();
            let value = cursor.eat_while(|c| c != quote);
            if !cursor.eat(quote) {
                return Err(cursor.error(start, format!("missing closing {quote}")));
            }
            Ok(value)
        }
        _ => {
            let value = cursor.eat_while(|c| c != ']' && !c.is_ascii_whitespace() && !is_quote(c));
            if value.is_empty() {
                return Err(cursor.error(start, "attribute selector has no value"));
            }
            Ok(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(selector: &str) -> Vec<Token> {
        tokenize(selector)
            .unwrap()
            .into_iter()
            .map(|(_, token)| token)
            .collect()
    }

    #[test]
    fn test_compound_and_combinators() {
        assert_eq!(
            kinds("div.a#b > *"),
            vec![
                Token::Ident("div".to_string()),
                Token::Class("a".to_string()),
                Token::Id("b".to_string()),
                Token::Whitespace,
                Token::Child,
                Token::Whitespace,
                Token::Universal,
            ]
        );
    }

    #[test]
    fn test_offsets_are_in_characters() {
        let tokens = tokenize("é .x").unwrap();
        let offsets: Vec<usize> = tokens.iter().map(|(offset, _)| *offset).collect();
        assert_eq!(offsets, vec![0, 1, 2]);
    }

    #[test]
    fn test_attribute_value_forms() {
        let expected = AttributeSelector::Equals("a".to_string(), "b c".to_string());
        assert_eq!(kinds(r#"[a="b c"]"#), vec![Token::Attribute(expected.clone())]);
        assert_eq!(kinds("[a='b c']"), vec![Token::Attribute(expected)]);
        assert_eq!(
            kinds("[ href ^= http://x ]"),
            vec![Token::Attribute(AttributeSelector::PrefixMatch(
                "href".to_string(),
                "http://x".to_string()
            ))]
        );
    }

    #[test]
    fn test_quote_inside_other_quote_is_kept() {
        assert_eq!(
            kinds(r#"[title="it's"]"#),
            vec![Token::Attribute(AttributeSelector::Equals(
                "title".to_string(),
                "it's".to_string()
            ))]
        );
    }

    #[test]
    fn test_mismatched_quote_is_rejected() {
        let err = tokenize(r#"[attr2="value2]"#).unwrap_err();
        assert_eq!(err.offset, 7);
        assert_eq!(err.message, "missing closing \"");

        let err = tokenize(r#"[a="b']"#).unwrap_err();
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn test_malformed_attribute_selectors() {
        assert_eq!(tokenize("[]").unwrap_err().message, "attribute selector has no name");
        assert_eq!(tokenize("[=x]").unwrap_err().message, "attribute selector has no name");
        assert_eq!(tokenize("[a^x]").unwrap_err().message, "expected '=' after '^'");
        assert_eq!(tokenize("[a=]").unwrap_err().message, "attribute selector has no value");
        assert_eq!(tokenize("[a=b").unwrap_err().message, "unterminated attribute selector");
        assert_eq!(tokenize("[a=b\"]").unwrap_err().message, "expected ']' but found '\"'");
    }

    #[test]
    fn test_unsupported_characters() {
        assert_eq!(tokenize("a:hover").unwrap_err().offset, 1);
        assert_eq!(tokenize("a + b").unwrap_err().message, "unexpected '+'");
        assert_eq!(tokenize("#").unwrap_err().message, "expected a name after '#'");
    }
}
