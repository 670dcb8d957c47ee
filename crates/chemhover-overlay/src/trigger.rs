//! Decides when nodes get scanned.

use std::sync::Arc;

use tracing::trace;

use crate::dom::{MutationRecord, Selection, SharedDocument};
use crate::overlay::OverlayRegistry;
use crate::queue::ScanQueue;

/// Feeds the scan queue from document mutations and selection releases.
pub struct Trigger {
    document: SharedDocument,
    queue: Arc<ScanQueue>,
    overlays: Arc<OverlayRegistry>,
}

impl Trigger {
    pub fn new(document: SharedDocument, queue: Arc<ScanQueue>, overlays: Arc<OverlayRegistry>) -> Self {
        Self {
            document,
            queue,
            overlays,
        }
    }

    /// Queue every added node. Removals drop overlay entries whose label
    /// left the document.
    ///
    /// Returns how many nodes were queued.
    pub fn on_mutations(&self, records: &[MutationRecord]) -> usize {
        let mut queued = 0;
        let mut removed = false;
        for record in records {
            self.queue.extend(record.added.iter().copied());
            queued += record.added.len();
            removed |= !record.removed.is_empty();
        }
        if removed {
            self.overlays.prune(&self.document.lock());
        }
        trace!("{} mutation records queued {} nodes", records.len(), queued);
        queued
    }

    /// Queue the start and end containers of a released selection.
    pub fn on_selection_release(&self, selection: &Selection) -> usize {
        self.queue.push(selection.start);
        if selection.end == selection.start {
            return 1;
        }
        self.queue.push(selection.end);
        2
    }
}
