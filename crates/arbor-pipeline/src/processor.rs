use arbor_dom::{DomTree, NodeId};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::PipelineError;
use crate::processors::{AttributeProcessor, ElementProcessor};

/// Reacts to parser events while the tree is being built.
///
/// Every callback receives the tree and the node the event is about. A
/// processor may rewrite or detach that node; the parser keeps going either
/// way. All callbacks default to doing nothing.
pub trait Processor {
    /// A new document is about to be parsed. Processors holding per-document
    /// state drop it here; a previous document may have stopped early.
    fn reset(&mut self) {}

    /// An element and its attributes were inserted. Its children are not
    /// parsed yet.
    ///
    /// # Errors
    ///
    /// Whatever the processor fails with. The pipeline stops dispatching and
    /// reports the first error.
    fn element_started(&mut self, _tree: &mut DomTree, _id: NodeId) -> Result<(), PipelineError> {
        Ok(())
    }

    /// An element and everything inside it were parsed.
    ///
    /// # Errors
    ///
    /// See [`Processor::element_started`].
    fn element_ended(&mut self, _tree: &mut DomTree, _id: NodeId) -> Result<(), PipelineError> {
        Ok(())
    }

    /// A text node was inserted.
    ///
    /// # Errors
    ///
    /// See [`Processor::element_started`].
    fn text_created(&mut self, _tree: &mut DomTree, _id: NodeId) -> Result<(), PipelineError> {
        Ok(())
    }
}

/// Builds a boxed processor from its JSON parameters.
pub type ProcessorFactory = fn(serde_json::Value) -> Result<Box<dyn Processor>, PipelineError>;

/// The built-in processors, by configuration name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProcessorKind {
    /// [`AttributeProcessor`].
    Attribute,
    /// [`ElementProcessor`].
    Element,
}

impl ProcessorKind {
    /// The constructor for this kind.
    #[must_use]
    pub fn factory(self) -> ProcessorFactory {
        match self {
            Self::Attribute => AttributeProcessor::from_params,
            Self::Element => ElementProcessor::from_params,
        }
    }

    /// Instantiate this processor from `params`.
    ///
    /// # Errors
    ///
    /// [`PipelineError::InvalidParams`] if `params` does not fit the
    /// processor's schema, including selectors that fail to parse.
    pub fn build(self, params: serde_json::Value) -> Result<Box<dyn Processor>, PipelineError> {
        (self.factory())(params)
    }
}

/// One entry of a pipeline configuration.
///
/// ```json
/// { "processor": "attribute", "params": { "selectors": ["a"], "action": "delete", "attribute": "href" } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorOption {
    /// Which processor to instantiate.
    pub processor: ProcessorKind,
    /// Parameters passed to the processor's factory.
    #[serde(default)]
    pub params: serde_json::Value,
}

impl ProcessorOption {
    /// Build an option from a processor name.
    ///
    /// # Errors
    ///
    /// [`PipelineError::UnknownProcessor`] if `name` is not a built-in.
    pub fn named(name: &str, params: serde_json::Value) -> Result<Self, PipelineError> {
        let processor = name
            .parse()
            .map_err(|_| PipelineError::UnknownProcessor(name.to_string()))?;
        Ok(Self { processor, params })
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_kind_names() {
        let names: Vec<String> = ProcessorKind::iter().map(|kind| kind.to_string()).collect();
        assert_eq!(names, ["attribute", "element"]);
        assert_eq!("element".parse::<ProcessorKind>().unwrap(), ProcessorKind::Element);
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let err = ProcessorOption::named("sanitize", serde_json::Value::Null).unwrap_err();
        assert!(matches!(err, PipelineError::UnknownProcessor(ref name) if name == "sanitize"));
    }

    #[test]
    fn test_every_kind_has_a_factory() {
        for kind in ProcessorKind::iter() {
            // Empty params are invalid for every built-in, but the factory runs.
            let err = kind.build(serde_json::json!({})).err().unwrap();
            assert!(matches!(err, PipelineError::InvalidParams { kind: k, .. } if k == kind));
        }
    }
}
