use arbor_css::ParsedSelector;
use arbor_dom::{Attr, DomTree, NodeId};
use serde::Deserialize;

use crate::error::PipelineError;
use crate::params::{OneOrMany, matches_any};
use crate::processor::{Processor, ProcessorKind};

/// What to do with the attribute on matching elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeAction {
    /// Set the attribute, replacing any existing value.
    Add,
    /// Remove the attribute if present.
    Delete,
}

/// The attribute to add or delete.
///
/// A bare name means an empty value when adding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AttributeSpec {
    /// `"attribute": "hidden"`
    Name(String),
    /// `"attribute": { "name": "rel", "value": "nofollow" }`
    Pair {
        /// Attribute name.
        name: String,
        /// Attribute value.
        #[serde(default)]
        value: String,
    },
}

impl AttributeSpec {
    /// The attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) | Self::Pair { name, .. } => name,
        }
    }

    fn to_attr(&self) -> Attr {
        match self {
            Self::Name(name) => Attr::new(name.as_str(), ""),
            Self::Pair { name, value } => Attr::new(name.as_str(), value.as_str()),
        }
    }
}

/// Parameters of the `"attribute"` processor.
#[derive(Debug, Clone, Deserialize)]
pub struct AttributeParams {
    /// Elements matching any of these are rewritten.
    pub selectors: OneOrMany<ParsedSelector>,
    /// Add or delete.
    pub action: AttributeAction,
    /// The attribute to act on.
    pub attribute: AttributeSpec,
}

/// Adds or deletes one attribute on every element matching a selector.
///
/// Elements are rewritten as soon as they start, so later selectors in the
/// same pipeline already see the new attributes.
#[derive(Debug, Clone)]
pub struct AttributeProcessor {
    selectors: Vec<ParsedSelector>,
    action: AttributeAction,
    attribute: AttributeSpec,
}

impl AttributeProcessor {
    /// A processor acting on elements matching any of `selectors`.
    #[must_use]
    pub const fn new(
        selectors: Vec<ParsedSelector>,
        action: AttributeAction,
        attribute: AttributeSpec,
    ) -> Self {
        Self {
            selectors,
            action,
            attribute,
        }
    }

    /// Factory used by [`ProcessorKind::Attribute`].
    ///
    /// # Errors
    ///
    /// [`PipelineError::InvalidParams`] if `params` is not [`AttributeParams`].
    pub fn from_params(params: serde_json::Value) -> Result<Box<dyn Processor>, PipelineError> {
        let params: AttributeParams =
            serde_json::from_value(params).map_err(|source| PipelineError::InvalidParams {
                kind: ProcessorKind::Attribute,
                source,
            })?;
        Ok(Box::new(Self::new(
            params.selectors.into_vec(),
            params.action,
            params.attribute,
        )))
    }
}

impl Processor for AttributeProcessor {
    fn element_started(&mut self, tree: &mut DomTree, id: NodeId) -> Result<(), PipelineError> {
        if !matches_any(&self.selectors, tree, id)? {
            return Ok(());
        }
        let Some(element) = tree.as_element_mut(id) else {
            return Ok(());
        };
        let _previous = match self.action {
            AttributeAction::Add => element.attributes.set_named_item(self.attribute.to_attr()),
            AttributeAction::Delete => element.attributes.remove_named_item(self.attribute.name()),
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_spec_shapes() {
        let name: AttributeSpec = serde_json::from_str(r#""hidden""#).unwrap();
        let pair: AttributeSpec =
            serde_json::from_str(r#"{ "name": "rel", "value": "nofollow" }"#).unwrap();
        assert_eq!(name.to_attr(), Attr::new("hidden", ""));
        assert_eq!(pair.name(), "rel");
        assert_eq!(pair.to_attr(), Attr::new("rel", "nofollow"));
    }

    #[test]
    fn test_bad_selector_is_invalid_params() {
        let err = AttributeProcessor::from_params(serde_json::json!({
            "selectors": ["a >"],
            "action": "add",
            "attribute": "x",
        }))
        .err()
        .unwrap();
        assert!(matches!(
            err,
            PipelineError::InvalidParams {
                kind: ProcessorKind::Attribute,
                ..
            }
        ));
    }
}
