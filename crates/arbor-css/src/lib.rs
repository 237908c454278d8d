//! CSS selector subset for arbor DOM trees.
//!
//! Supported syntax, per [Selectors Level 4](https://www.w3.org/TR/selectors-4/):
//! - type (`div`), universal (`*`), class (`.item`) and id (`#main`) selectors
//! - attribute selectors: `[attr]`, `[attr=value]`, `[attr^=value]`,
//!   `[attr*=value]`, `[attr$=value]`, with the value bare, single-quoted or
//!   double-quoted
//! - the descendant (whitespace) and child (`>`) combinators
//!
//! `[attr~=value]` and `[attr|=value]` parse, but evaluating them fails with
//! [`SelectorError::UnsupportedOperator`]. Pseudo-classes, the sibling
//! combinators and selector lists are rejected at parse time.
//!
//! ```
//! use arbor_css::Matches;
//!
//! let tree = arbor_html::parse(r#"<ul><li class="on">a</li></ul>"#).unwrap();
//! let ul = tree.child_elements(tree.body().unwrap())[0];
//! let li = tree.child_elements(ul)[0];
//! assert!(tree.matches(li, "ul > li.on").unwrap());
//! ```

/// Selector errors.
pub mod error;
/// Selector lexing, parsing and matching.
pub mod selector;

pub use error::{SelectorError, SelectorParseError};
pub use selector::{
    AttributeSelector, Combinator, ComplexSelector, CompoundSelector, Matches, ParsedSelector,
    SimpleSelector, parse_selector,
};
