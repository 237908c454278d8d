use std::cell::RefCell;
use std::rc::Rc;

use arbor_common::warning::clear_warnings;
use arbor_dom::{DomTree, NodeId};
use arbor_html::{EventKind, HtmlParser, ParseIssue};

use crate::error::PipelineError;
use crate::processor::{Processor, ProcessorOption};

#[derive(Default)]
struct Stage {
    processors: Vec<Box<dyn Processor>>,
    error: Option<PipelineError>,
}

impl Stage {
    fn reset(&mut self) {
        self.error = None;
        for processor in &mut self.processors {
            processor.reset();
        }
    }

    /// Hand one event to every processor in order. After the first failure
    /// the remaining events of the document are dropped.
    fn dispatch(&mut self, kind: EventKind, tree: &mut DomTree, id: NodeId) {
        if self.error.is_some() {
            return;
        }
        for processor in &mut self.processors {
            let result = match kind {
                EventKind::ElementStarted => processor.element_started(tree, id),
                EventKind::ElementEnded => processor.element_ended(tree, id),
                EventKind::TextCreated => processor.text_created(tree, id),
            };
            if let Err(err) = result {
                self.error = Some(err);
                return;
            }
        }
    }
}

/// Parses HTML and rewrites it through an ordered list of processors.
///
/// Processors see every event in the order they were piped. A pipeline can
/// process any number of documents.
pub struct HtmlPipeline {
    parser: HtmlParser,
    stage: Rc<RefCell<Stage>>,
}

impl HtmlPipeline {
    /// A pipeline with no processors; it returns its input re-serialized.
    #[must_use]
    pub fn new() -> Self {
        let stage = Rc::new(RefCell::new(Stage::default()));
        let mut parser = HtmlParser::new();
        for kind in [
            EventKind::ElementStarted,
            EventKind::ElementEnded,
            EventKind::TextCreated,
        ] {
            let stage = Rc::clone(&stage);
            parser.on(kind, move |tree, id| {
                stage.borrow_mut().dispatch(kind, tree, id);
            });
        }
        Self { parser, stage }
    }

    /// A pipeline built from a JSON list of [`ProcessorOption`]s.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Config`] if `json` is not such a list.
    /// - [`PipelineError::InvalidParams`] if an entry's parameters are wrong.
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        let options: Vec<ProcessorOption> =
            serde_json::from_str(json).map_err(PipelineError::Config)?;
        let mut pipeline = Self::new();
        for option in options {
            let _ = pipeline.pipe(option)?;
        }
        Ok(pipeline)
    }

    /// Instantiate a built-in processor and append it.
    ///
    /// # Errors
    ///
    /// [`PipelineError::InvalidParams`] if the parameters do not fit.
    pub fn pipe(&mut self, option: ProcessorOption) -> Result<&mut Self, PipelineError> {
        let processor = option.processor.build(option.params)?;
        self.stage.borrow_mut().processors.push(processor);
        Ok(self)
    }

    /// Append a processor instance.
    pub fn pipe_processor(&mut self, processor: impl Processor + 'static) -> &mut Self {
        self.stage.borrow_mut().processors.push(Box::new(processor));
        self
    }

    /// Number of processors in the pipeline.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stage.borrow().processors.len()
    }

    /// Whether the pipeline has no processors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse `html`, run every processor, and return the tree.
    ///
    /// Every processor is reset first, and parser warnings are deduplicated
    /// per document.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Parse`] if the input cannot be tokenized.
    /// - The first error returned by a processor.
    pub fn process_tree(&mut self, html: &str) -> Result<DomTree, PipelineError> {
        clear_warnings();
        self.stage.borrow_mut().reset();
        let parsed = self.parser.parse(html);
        if let Some(err) = self.stage.borrow_mut().error.take() {
            return Err(err);
        }
        Ok(parsed?)
    }

    /// Parse `html`, run every processor, and serialize the document
    /// element.
    ///
    /// # Errors
    ///
    /// See [`HtmlPipeline::process_tree`].
    pub fn process(&mut self, html: &str) -> Result<String, PipelineError> {
        let tree = self.process_tree(html)?;
        Ok(tree
            .document_element()
            .map(|root| tree.outer_html(root))
            .unwrap_or_default())
    }

    /// Issues recorded while parsing the last document.
    #[must_use]
    pub fn issues(&self) -> &[ParseIssue] {
        self.parser.issues()
    }
}

impl Default for HtmlPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Uppercase;

    impl Processor for Uppercase {
        fn text_created(&mut self, tree: &mut DomTree, id: NodeId) -> Result<(), PipelineError> {
            let text = tree.as_text(id).unwrap_or_default().to_uppercase();
            let parent = tree.parent(id).unwrap();
            let replacement = tree.create_text(text);
            let _ = tree.insert_before(parent, replacement, id).unwrap();
            tree.remove(id);
            Ok(())
        }
    }

    #[test]
    fn test_empty_pipeline_reserializes() {
        let mut pipeline = HtmlPipeline::new();
        assert!(pipeline.is_empty());
        assert_eq!(
            pipeline.process("<p>x</p>").unwrap(),
            "<html><body><p>x</p></body></html>"
        );
    }

    #[test]
    fn test_custom_processor() {
        let mut pipeline = HtmlPipeline::new();
        let _ = pipeline.pipe_processor(Uppercase);
        assert_eq!(pipeline.len(), 1);
        assert_eq!(
            pipeline.process("<p>quiet</p>").unwrap(),
            "<html><body><p>QUIET</p></body></html>"
        );
    }
}
