//! FIFO of nodes waiting to be scanned.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::Notify;
use tracing::trace;

use crate::dom::NodeId;

/// Nodes pending scan, in arrival order.
#[derive(Default)]
pub struct ScanQueue {
    items: Mutex<VecDeque<NodeId>>,
    notify: Notify,
    enqueued: AtomicU64,
}

impl ScanQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, node: NodeId) {
        trace!("enqueue {}", node);
        self.items.lock().push_back(node);
        self.enqueued.fetch_add(1, Ordering::Relaxed);
        self.notify.notify_one();
    }

    pub fn extend(&self, nodes: impl IntoIterator<Item = NodeId>) {
        for node in nodes {
            self.push(node);
        }
    }

    pub fn pop(&self) -> Option<NodeId> {
        self.items.lock().pop_front()
    }

    /// Wait until a node is available and take it.
    pub async fn next(&self) -> NodeId {
        loop {
            if let Some(node) = self.pop() {
                return node;
            }
            self.notify.notified().await;
        }
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Nodes pushed over the queue's lifetime.
    pub fn total_enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }
}
