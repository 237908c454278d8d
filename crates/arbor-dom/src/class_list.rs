//! [§ 7.1 Interface DOMTokenList](https://dom.spec.whatwg.org/#interface-domtokenlist)
//!
//! The class list is not stored separately: every read re-derives the token
//! set from the current `class` attribute, and every mutation writes the
//! space-joined set back. The view can therefore never drift from the
//! attribute it describes.

use crate::attributes::NamedNodeMap;

const CLASS: &str = "class";

/// Split a `class` value into deduplicated tokens, first occurrence wins.
#[must_use]
pub fn tokens(value: &str) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for token in value.split_ascii_whitespace() {
        if !out.contains(&token) {
            out.push(token);
        }
    }
    out
}

/// A live, mutable view over an element's `class` attribute.
pub struct ClassList<'a> {
    attributes: &'a mut NamedNodeMap,
}

impl<'a> ClassList<'a> {
    pub(crate) fn new(attributes: &'a mut NamedNodeMap) -> Self {
        Self { attributes }
    }

    fn owned_tokens(&self) -> Vec<String> {
        tokens(self.attributes.get(CLASS).unwrap_or_default())
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    fn write(&mut self, tokens: &[String]) {
        let _ = self.attributes.set(CLASS, tokens.join(" "));
    }

    /// The current tokens.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        self.owned_tokens()
    }

    /// Number of distinct tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        tokens(self.attributes.get(CLASS).unwrap_or_default()).len()
    }

    /// Whether there are no tokens.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `token` is present.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        tokens(self.attributes.get(CLASS).unwrap_or_default()).contains(&token)
    }

    /// Append each token not already present. Creates the attribute if needed.
    pub fn add(&mut self, new_tokens: &[&str]) {
        let mut current = self.owned_tokens();
        for token in new_tokens {
            if !current.iter().any(|existing| existing == token) {
                current.push((*token).to_owned());
            }
        }
        self.write(&current);
    }

    /// Remove each token that is present.
    pub fn remove(&mut self, old_tokens: &[&str]) {
        let mut current = self.owned_tokens();
        current.retain(|existing| !old_tokens.contains(&existing.as_str()));
        self.write(&current);
    }

    /// Replace `old` with `new` in place.
    ///
    /// Returns `false` and changes nothing if `old` is absent. If `new` is
    /// already present elsewhere, `old` is simply dropped.
    pub fn replace(&mut self, old: &str, new: &str) -> bool {
        let mut current = self.owned_tokens();
        let Some(index) = current.iter().position(|existing| existing == old) else {
            return false;
        };
        if current.iter().any(|existing| existing == new) {
            let _ = current.remove(index);
        } else {
            current[index] = new.to_owned();
        }
        self.write(&current);
        true
    }
}
