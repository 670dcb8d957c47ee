//! Document errors.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomError {
    /// The node handle does not belong to this document.
    #[error("Node not found: {0}")]
    NodeNotFound(usize),

    /// The node has no parent, so it cannot be replaced in place.
    #[error("Node {0} is detached from the document")]
    Detached(usize),

    /// Only text nodes can be swapped for overlay markup.
    #[error("Node {0} is not a text node")]
    NotText(usize),

    /// The insertion would put a node inside a non-element or inside itself.
    #[error("Cannot insert node {child} under node {parent}")]
    InvalidHierarchy { parent: usize, child: usize },
}
