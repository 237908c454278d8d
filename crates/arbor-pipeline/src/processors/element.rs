use arbor_css::ParsedSelector;
use arbor_dom::{DomTree, NodeId};
use serde::Deserialize;

use crate::error::PipelineError;
use crate::params::{OneOrMany, matches_any};
use crate::processor::{Processor, ProcessorKind};

/// How matching elements are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ElementAction {
    /// Detach every matching element, subtree included.
    Remove,
    /// Keep matching elements and the path leading to them; detach
    /// everything else in scope.
    RemoveOthers,
}

/// Parameters of the `"element"` processor.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementParams {
    /// Elements matching any of these are acted on.
    pub selectors: OneOrMany<ParsedSelector>,
    /// Remove them, or remove everything else.
    pub action: ElementAction,
    /// Restrict the processor to the inside of the first element matching
    /// one of these. Without it the whole document is in scope.
    #[serde(default)]
    pub if_in: Option<OneOrMany<ParsedSelector>>,
}

/// Removes elements by selector, or strips everything around them.
///
/// The processor is active inside a scope element: the first element that
/// matches `if_in`, or the first element of the document when `if_in` is
/// not set. The scope closes when that element ends and reopens at the next
/// element that qualifies.
///
/// With [`ElementAction::RemoveOthers`], a matching element is kept with
/// its whole subtree. Its ancestors inside the scope are kept too; every
/// other element and text node in the scope is detached. Once a kept
/// element ends, the next matching element becomes the kept one.
#[derive(Debug, Clone)]
pub struct ElementProcessor {
    selectors: Vec<ParsedSelector>,
    action: ElementAction,
    if_in: Option<Vec<ParsedSelector>>,
    scope: Option<NodeId>,
    kept: Option<NodeId>,
    kept_path: Vec<NodeId>,
}

impl ElementProcessor {
    /// A processor acting on elements matching any of `selectors`.
    #[must_use]
    pub const fn new(
        selectors: Vec<ParsedSelector>,
        action: ElementAction,
        if_in: Option<Vec<ParsedSelector>>,
    ) -> Self {
        Self {
            selectors,
            action,
            if_in,
            scope: None,
            kept: None,
            kept_path: Vec::new(),
        }
    }

    /// Factory used by [`ProcessorKind::Element`].
    ///
    /// # Errors
    ///
    /// [`PipelineError::InvalidParams`] if `params` is not [`ElementParams`].
    pub fn from_params(params: serde_json::Value) -> Result<Box<dyn Processor>, PipelineError> {
        let params: ElementParams =
            serde_json::from_value(params).map_err(|source| PipelineError::InvalidParams {
                kind: ProcessorKind::Element,
                source,
            })?;
        Ok(Box::new(Self::new(
            params.selectors.into_vec(),
            params.action,
            params.if_in.map(OneOrMany::into_vec),
        )))
    }

    fn opens_scope(&self, tree: &DomTree, id: NodeId) -> Result<bool, PipelineError> {
        match &self.if_in {
            None => Ok(true),
            Some(selectors) => matches_any(selectors, tree, id),
        }
    }

    const fn removes_others(&self) -> bool {
        matches!(self.action, ElementAction::RemoveOthers)
    }
}

impl Processor for ElementProcessor {
    fn reset(&mut self) {
        self.scope = None;
        self.kept = None;
        self.kept_path.clear();
    }

    fn element_started(&mut self, tree: &mut DomTree, id: NodeId) -> Result<(), PipelineError> {
        if self.scope.is_none() && self.opens_scope(tree, id)? {
            self.scope = Some(id);
        }
        let Some(scope) = self.scope else {
            return Ok(());
        };
        if !matches_any(&self.selectors, tree, id)? {
            return Ok(());
        }
        match self.action {
            ElementAction::Remove => tree.remove(id),
            ElementAction::RemoveOthers if self.kept.is_none() => {
                self.kept = Some(id);
                // Parent links are still intact here; by the time the
                // ancestors end, detached siblings may have cut them.
                self.kept_path = tree
                    .ancestors(id)
                    .take_while(|&ancestor| ancestor != scope)
                    .collect();
            }
            ElementAction::RemoveOthers => {}
        }
        Ok(())
    }

    fn element_ended(&mut self, tree: &mut DomTree, id: NodeId) -> Result<(), PipelineError> {
        if self.scope == Some(id) {
            self.reset();
        }
        if self.scope.is_none() || !self.removes_others() {
            return Ok(());
        }
        if self.kept == Some(id) {
            self.kept = None;
        } else if self.kept.is_none() && !self.kept_path.contains(&id) {
            tree.remove(id);
        }
        Ok(())
    }

    fn text_created(&mut self, tree: &mut DomTree, id: NodeId) -> Result<(), PipelineError> {
        if self.scope.is_some() && self.kept.is_none() && self.removes_others() {
            tree.remove(id);
        }
        Ok(())
    }
}
