use thiserror::Error;

use crate::NodeId;

/// Errors raised by tree mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// A second root element was appended to the document.
    #[error("document can only have one child element")]
    DocumentStructure,

    /// The reference child of an insertion is not a child of the parent.
    #[error("child {child:?} couldn't be found under {parent:?}")]
    ChildNotFound {
        /// The node the insertion targeted.
        parent: NodeId,
        /// The missing reference child.
        child: NodeId,
    },

    /// The insertion would produce a malformed tree.
    #[error("cannot insert {child:?} under {parent:?}: {reason}")]
    HierarchyRequest {
        /// The node the insertion targeted.
        parent: NodeId,
        /// The node being inserted.
        child: NodeId,
        /// What was wrong.
        reason: &'static str,
    },
}
