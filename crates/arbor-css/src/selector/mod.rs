//! CSS selector parsing and matching
//!
//! This module implements the subset of
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/) described in the
//! crate docs.

/// Selector tokenizer.
pub mod lexer;

use std::fmt;
use std::str::FromStr;

use arbor_dom::{DomTree, ElementData, NodeId};
use serde::{Deserialize, Serialize};

use self::lexer::{Token, tokenize};
use crate::error::{SelectorError, SelectorParseError};

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// A simple selector is a single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    ///
    /// Stored upper-cased, the way element tag names are.
    Type(String),

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    Universal,

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    Id(String),

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    Attribute(AttributeSelector),
}

/// Attribute selectors per [§ 6.4](https://www.w3.org/TR/selectors-4/#attribute-selectors)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSelector {
    /// `[attr]`: "Represents an element with the att attribute"
    Exists(String),

    /// `[attr=value]`: the value is exactly `value`. An empty `value`
    /// (`[attr=""]`) only tests presence.
    Equals(String, String),

    /// `[attr^=value]`: the value begins with `value`.
    PrefixMatch(String, String),

    /// `[attr*=value]`: the value contains `value`.
    SubstringMatch(String, String),

    /// `[attr$=value]`: the value ends with `value`.
    SuffixMatch(String, String),

    /// `[attr~=value]`. Parsed but not evaluated.
    Includes(String, String),

    /// `[attr|=value]`. Parsed but not evaluated.
    DashMatch(String, String),
}

impl AttributeSelector {
    /// The attribute this selector tests.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Exists(name)
            | Self::Equals(name, _)
            | Self::PrefixMatch(name, _)
            | Self::SubstringMatch(name, _)
            | Self::SuffixMatch(name, _)
            | Self::Includes(name, _)
            | Self::DashMatch(name, _) => name,
        }
    }

    /// Test the element's attributes.
    ///
    /// An element without the attribute never matches, whatever the operator.
    ///
    /// # Errors
    ///
    /// [`SelectorError::UnsupportedOperator`] for `~=` and `|=` when the
    /// attribute is present.
    pub fn matches(&self, element: &ElementData) -> Result<bool, SelectorError> {
        let Some(value) = element.attributes.get(self.name()) else {
            return Ok(false);
        };
        Ok(match self {
            Self::Exists(_) => true,
            Self::Equals(_, expected) => expected.is_empty() || value == expected,
            Self::PrefixMatch(_, prefix) => value.starts_with(prefix.as_str()),
            Self::SubstringMatch(_, part) => value.contains(part.as_str()),
            Self::SuffixMatch(_, suffix) => value.ends_with(suffix.as_str()),
            Self::Includes(name, _) => {
                return Err(SelectorError::UnsupportedOperator {
                    operator: "~=",
                    name: name.clone(),
                });
            }
            Self::DashMatch(name, _) => {
                return Err(SelectorError::UnsupportedOperator {
                    operator: "|=",
                    name: name.clone(),
                });
            }
        })
    }
}

impl SimpleSelector {
    /// Check if this simple selector matches the given element.
    ///
    /// # Errors
    ///
    /// See [`AttributeSelector::matches`].
    pub fn matches(&self, element: &ElementData) -> Result<bool, SelectorError> {
        Ok(match self {
            Self::Type(name) => element.tag_name() == name,
            Self::Universal => true,
            Self::Class(class_name) => element.classes().contains(&class_name.as_str()),
            Self::Id(id) => element.id() == Some(id.as_str()),
            Self::Attribute(attribute) => return attribute.matches(element),
        })
    }
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    /// The list of simple selectors that make up this compound selector.
    pub simple_selectors: Vec<SimpleSelector>,
}

impl CompoundSelector {
    /// Whether every simple selector matches the node. Non-elements never
    /// match. Evaluation stops at the first failing condition.
    ///
    /// # Errors
    ///
    /// See [`AttributeSelector::matches`].
    pub fn matches(&self, tree: &DomTree, node_id: NodeId) -> Result<bool, SelectorError> {
        let Some(element) = tree.as_element(node_id) else {
            return Ok(false);
        };
        for simple in &self.simple_selectors {
            if !simple.matches(element)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A selector of the form 'A B' represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    Descendant,

    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// "A selector of the form 'A > B' represents an element B that is a
    /// direct child of element A."
    Child,
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// Example: `div.container > ul li`
/// ```text
/// [div.container] --(Child)--> [ul] --(Descendant)--> [li]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// The rightmost compound selector (the subject of the selector).
    pub subject: CompoundSelector,

    /// Chain of (combinator, `compound_selector`) pairs going left from the subject.
    ///
    /// For `A > B C`, this is `[(Descendant, B), (Child, A)]`.
    pub combinators: Vec<(Combinator, CompoundSelector)>,
}

/// A parsed selector ready for matching.
///
/// Parse with [`parse_selector`] or [`str::parse`]. It also deserializes
/// from a string, so configuration can carry selectors that were validated
/// up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ParsedSelector {
    /// The complex selector (compound selectors with combinators).
    pub complex: ComplexSelector,
    source: String,
}

impl ParsedSelector {
    /// The selector text this was parsed from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    ///
    /// Matching runs right to left: the subject must match `node_id`, then
    /// each compound to its left must match the parent (`>`) or some
    /// ancestor (whitespace) of the element matched before it. Ancestor
    /// searches take the nearest match and never backtrack.
    ///
    /// # Errors
    ///
    /// [`SelectorError::UnsupportedOperator`] if an evaluated attribute
    /// selector uses `~=` or `|=`.
    pub fn matches_in_tree(&self, tree: &DomTree, node_id: NodeId) -> Result<bool, SelectorError> {
        if !self.complex.subject.matches(tree, node_id)? {
            return Ok(false);
        }

        let mut current_id = node_id;
        for (combinator, compound) in &self.complex.combinators {
            let matched = match combinator {
                Combinator::Descendant => {
                    let mut found = None;
                    for ancestor_id in tree.ancestors(current_id) {
                        if compound.matches(tree, ancestor_id)? {
                            found = Some(ancestor_id);
                            break;
                        }
                    }
                    found
                }
                Combinator::Child => match tree.parent(current_id) {
                    Some(parent_id) => compound.matches(tree, parent_id)?.then_some(parent_id),
                    None => None,
                },
            };
            let Some(matched_id) = matched else {
                return Ok(false);
            };
            current_id = matched_id;
        }
        Ok(true)
    }
}

impl FromStr for ParsedSelector {
    type Err = SelectorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_selector(s)
    }
}

impl TryFrom<String> for ParsedSelector {
    type Error = SelectorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_selector(&value)
    }
}

impl From<ParsedSelector> for String {
    fn from(selector: ParsedSelector) -> Self {
        selector.source
    }
}

impl fmt::Display for ParsedSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Parse a selector string.
///
/// Leading and trailing whitespace is ignored; whitespace around `>` is
/// optional.
///
/// # Errors
///
/// Returns a [`SelectorParseError`] for empty selectors, unsupported syntax,
/// misplaced combinators, a type selector after other conditions in the same
/// compound, and malformed attribute selectors.
pub fn parse_selector(raw: &str) -> Result<ParsedSelector, SelectorParseError> {
    let error = |offset: usize, message: &str| SelectorParseError::new(raw, offset, message);

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(error(0, "empty selector"));
    }
    let leading = raw.chars().count() - raw.trim_start().chars().count();

    let mut compounds: Vec<CompoundSelector> = Vec::new();
    let mut combinators_between: Vec<Combinator> = Vec::new();
    let mut current: Vec<SimpleSelector> = Vec::new();
    let mut pending: Option<Combinator> = None;

    for (offset, token) in tokenize(trimmed).map_err(|err| SelectorParseError {
        selector: raw.to_string(),
        offset: err.offset + leading,
        message: err.message,
    })? {
        let offset = offset + leading;
        let simple = match token {
            Token::Whitespace => {
                if pending.is_none() {
                    pending = Some(Combinator::Descendant);
                }
                continue;
            }
            Token::Child => {
                if current.is_empty() && compounds.is_empty() {
                    return Err(error(offset, "'>' has no selector on its left"));
                }
                if pending == Some(Combinator::Child) || (current.is_empty() && pending.is_none()) {
                    return Err(error(offset, "two combinators in a row"));
                }
                pending = Some(Combinator::Child);
                continue;
            }
            Token::Ident(name) => SimpleSelector::Type(name.to_ascii_uppercase()),
            Token::Universal => SimpleSelector::Universal,
            Token::Class(name) => SimpleSelector::Class(name),
            Token::Id(name) => SimpleSelector::Id(name),
            Token::Attribute(attribute) => SimpleSelector::Attribute(attribute),
        };

        if let Some(combinator) = pending.take() {
            if !current.is_empty() {
                compounds.push(CompoundSelector {
                    simple_selectors: std::mem::take(&mut current),
                });
                combinators_between.push(combinator);
            }
        }
        if matches!(simple, SimpleSelector::Type(_) | SimpleSelector::Universal)
            && !current.is_empty()
        {
            return Err(error(offset, "type selector must come first in a compound"));
        }
        current.push(simple);
    }

    if pending == Some(Combinator::Child) {
        return Err(error(raw.chars().count(), "selector ends with a combinator"));
    }

    // [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    // "The elements represented by a complex selector are the elements matched
    // by the last compound selector in the complex selector."
    let subject = CompoundSelector {
        simple_selectors: current,
    };
    let combinators = compounds
        .into_iter()
        .zip(combinators_between)
        .rev()
        .map(|(compound, combinator)| (combinator, compound))
        .collect();

    Ok(ParsedSelector {
        complex: ComplexSelector {
            subject,
            combinators,
        },
        source: raw.to_string(),
    })
}

/// `element.matches(selector)` for [`DomTree`] nodes.
pub trait Matches {
    /// Whether the node `id` matches `selector`. Non-element nodes never
    /// match.
    ///
    /// # Errors
    ///
    /// [`SelectorError::Parse`] if `selector` does not parse;
    /// [`SelectorError::UnsupportedOperator`] if evaluation reaches a `~=` or
    /// `|=` attribute selector.
    fn matches(&self, id: NodeId, selector: &str) -> Result<bool, SelectorError>;
}

impl Matches for DomTree {
    fn matches(&self, id: NodeId, selector: &str) -> Result<bool, SelectorError> {
        parse_selector(selector)?.matches_in_tree(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_is_stored_right_to_left() {
        let selector = parse_selector("a > b c").unwrap();
        let names: Vec<&SimpleSelector> = selector
            .complex
            .combinators
            .iter()
            .map(|(_, compound)| &compound.simple_selectors[0])
            .collect();
        assert_eq!(
            names,
            vec![
                &SimpleSelector::Type("B".to_string()),
                &SimpleSelector::Type("A".to_string())
            ]
        );
        let combinators: Vec<Combinator> = selector
            .complex
            .combinators
            .iter()
            .map(|(combinator, _)| *combinator)
            .collect();
        assert_eq!(combinators, vec![Combinator::Descendant, Combinator::Child]);
    }

    #[test]
    fn test_error_offsets_account_for_leading_whitespace() {
        let err = parse_selector("  a:b").unwrap_err();
        assert_eq!(err.offset, 3);
        assert_eq!(err.selector, "  a:b");
    }

    #[test]
    fn test_combinator_placement() {
        assert!(parse_selector("> a").is_err());
        assert!(parse_selector("a >").is_err());
        assert!(parse_selector("a > > b").is_err());
        assert!(parse_selector("a>b").is_ok());
        assert!(parse_selector("a  >  b").is_ok());
    }

    #[test]
    fn test_type_after_class_is_rejected() {
        assert!(parse_selector(".a*").is_err());
        assert!(parse_selector("[x]div").is_err());
    }

    #[test]
    fn test_display_is_source() {
        let selector: ParsedSelector = " ul > li ".parse().unwrap();
        assert_eq!(selector.to_string(), " ul > li ");
    }
}
