use strum_macros::{Display, EnumIter};

/// Elements whose content is raw text: no tags are recognized inside them
/// until the matching end tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum RawTextElement {
    /// `<script>`
    Script,
    /// `<style>`
    Style,
}

impl RawTextElement {
    /// Lower-case tag name, as matched against `</name>`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Style => "style",
        }
    }

    /// The raw text element named `tag_name`, compared ASCII
    /// case-insensitively.
    #[must_use]
    pub fn from_tag(tag_name: &str) -> Option<Self> {
        if tag_name.eq_ignore_ascii_case("script") {
            Some(Self::Script)
        } else if tag_name.eq_ignore_ascii_case("style") {
            Some(Self::Style)
        } else {
            None
        }
    }
}

/// The tokenizer's states.
///
/// `RawTextEnd(element, n)` means the last `n` characters of a possible
/// `</name>` have been matched: `n == 0` after `<`, `n == 1` after `</`,
/// and `n == name.len() + 1` once the whole name has been seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TokenizerState {
    /// Character data.
    Text,
    /// After `<`.
    TagStartOrEnd,
    /// Reading a start tag name.
    TagStart,
    /// Reading an end tag name after `</`.
    TagEnd,
    /// Inside a start tag, between attributes.
    AttrIdle,
    /// Reading an attribute name.
    AttrName,
    /// After an attribute name and whitespace: `=` or a new name may follow.
    AttrIdleOrName,
    /// After `=`, waiting for the value.
    AttrEqual,
    /// Reading an attribute value, quoted or not.
    AttrValue,
    /// Inside a raw text element.
    RawText(RawTextElement),
    /// Matching the end tag of a raw text element.
    RawTextEnd(RawTextElement, usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_text_lookup_ignores_case() {
        assert_eq!(RawTextElement::from_tag("SCRIPT"), Some(RawTextElement::Script));
        assert_eq!(RawTextElement::from_tag("Style"), Some(RawTextElement::Style));
        assert_eq!(RawTextElement::from_tag("textarea"), None);
        assert_eq!(RawTextElement::Script.to_string(), "script");
    }
}
