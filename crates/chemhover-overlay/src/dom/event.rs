//! Events delivered by and to a [`Document`](super::Document).

use tokio::sync::mpsc;

use super::NodeId;

/// One structural change under a connected node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    /// Node whose child list changed.
    pub target: NodeId,
    pub added: Vec<NodeId>,
    pub removed: Vec<NodeId>,
}

/// Receives mutation batches from the document it was created by.
pub struct MutationObserver {
    rx: mpsc::UnboundedReceiver<Vec<MutationRecord>>,
}

impl MutationObserver {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<Vec<MutationRecord>>) -> Self {
        Self { rx }
    }

    /// Wait for the next batch. `None` once the document is gone.
    pub async fn next_batch(&mut self) -> Option<Vec<MutationRecord>> {
        self.rx.recv().await
    }

    /// Take a batch that is already queued, without waiting.
    pub fn try_batch(&mut self) -> Option<Vec<MutationRecord>> {
        self.rx.try_recv().ok()
    }
}

/// Pointer movement relative to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// Pointer entered the node at client coordinates.
    Over { x: i32, y: i32 },
    Out,
}

/// What a node does in response to a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    /// Show the target node at the pointer position.
    ShowAt(NodeId),
    /// Hide the target node.
    Hide(NodeId),
}

/// Pointer handlers installed on one node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointerBinding {
    pub over: Option<PointerAction>,
    pub out: Option<PointerAction>,
}

/// A released text selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: NodeId,
    pub end: NodeId,
}

impl Selection {
    pub fn new(start: NodeId, end: NodeId) -> Self {
        Self { start, end }
    }

    /// A selection inside a single node.
    pub fn collapsed(node: NodeId) -> Self {
        Self::new(node, node)
    }
}
