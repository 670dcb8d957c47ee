//! Per-page overlay state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chemhover_config::Config;
use chemhover_protocols::{Inference, StructureRenderer};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::dom::{MutationObserver, Selection, SharedDocument};
use crate::overlay::{OverlayRegistry, OverlaySettings};
use crate::queue::ScanQueue;
use crate::scheduler::{ScanReport, ScanScheduler};
use crate::trigger::Trigger;
use crate::walker::{Walker, WalkerSettings};

/// Result of [`PageSession::inject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Injection {
    /// The body is queued and mutations are observed from now on.
    Started,
    AlreadyInjected,
    /// The page did not pass the site gate.
    NotAllowed,
}

/// Everything the overlay keeps for one page, created when the page is
/// injected and dropped with it.
pub struct PageSession {
    document: SharedDocument,
    queue: Arc<ScanQueue>,
    overlays: Arc<OverlayRegistry>,
    scheduler: Arc<ScanScheduler>,
    trigger: Arc<Trigger>,
    injected: AtomicBool,
    observer: Mutex<Option<MutationObserver>>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl PageSession {
    pub fn new(
        document: SharedDocument,
        inference: Arc<dyn Inference>,
        renderer: Arc<dyn StructureRenderer>,
        config: &Config,
    ) -> Self {
        let queue = Arc::new(ScanQueue::new());
        let overlays = Arc::new(OverlayRegistry::new(
            OverlaySettings::from_config(config),
            renderer,
        ));
        let walker = Arc::new(Walker::new(
            document.clone(),
            inference,
            overlays.clone(),
            queue.clone(),
            WalkerSettings::from_config(config),
        ));
        let scheduler = Arc::new(ScanScheduler::new(
            queue.clone(),
            walker,
            config.walker.max_concurrent_scans,
        ));
        let trigger = Arc::new(Trigger::new(document.clone(), queue.clone(), overlays.clone()));

        Self {
            document,
            queue,
            overlays,
            scheduler,
            trigger,
            injected: AtomicBool::new(false),
            observer: Mutex::new(None),
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn document(&self) -> &SharedDocument {
        &self.document
    }

    pub fn overlays(&self) -> &Arc<OverlayRegistry> {
        &self.overlays
    }

    pub fn queue(&self) -> &Arc<ScanQueue> {
        &self.queue
    }

    pub fn scheduler(&self) -> &Arc<ScanScheduler> {
        &self.scheduler
    }

    pub fn is_injected(&self) -> bool {
        self.injected.load(Ordering::SeqCst)
    }

    /// Activate the overlay on this page if `allowed`. Only the first allowed
    /// call has an effect.
    pub fn inject(&self, allowed: bool) -> Injection {
        if !allowed {
            debug!("Overlay not allowed on this page");
            return Injection::NotAllowed;
        }
        if self.injected.swap(true, Ordering::SeqCst) {
            debug!("Overlay already injected");
            return Injection::AlreadyInjected;
        }

        let body = {
            let mut doc = self.document.lock();
            *self.observer.lock() = Some(doc.observe());
            doc.body()
        };
        self.queue.push(body);
        info!("Overlay injected");
        Injection::Started
    }

    /// The user released a text selection. Ignored before injection.
    pub fn selection_released(&self, selection: Selection) -> usize {
        if !self.is_injected() {
            return 0;
        }
        self.trigger.on_selection_release(&selection)
    }

    /// Feed mutation batches that are already waiting to the trigger.
    fn deliver_mutations(&self) -> usize {
        let mut observer = self.observer.lock();
        let Some(observer) = observer.as_mut() else {
            return 0;
        };
        let mut queued = 0;
        while let Some(batch) = observer.try_batch() {
            queued += self.trigger.on_mutations(&batch);
        }
        queued
    }

    /// Scan until the page settles: the queue is empty, no scan is running,
    /// and the mutations the scans caused have been handled.
    pub async fn run_until_idle(&self) -> ScanReport {
        let mut total = ScanReport::default();
        loop {
            let report = self.scheduler.run_until_idle().await;
            total.merge(&report);
            if self.deliver_mutations() == 0 && self.queue.is_empty() {
                break;
            }
        }
        total
    }

    /// Run the scheduler and the mutation feed on background tasks. They stop
    /// when the session is dropped. Call after [`inject`](Self::inject).
    pub fn spawn(&self) {
        let mut tasks = self.tasks.lock();
        if !tasks.is_empty() {
            return;
        }
        tasks.push(self.scheduler.clone().spawn());

        if let Some(mut observer) = self.observer.lock().take() {
            let trigger = self.trigger.clone();
            tasks.push(tokio::spawn(async move {
                while let Some(batch) = observer.next_batch().await {
                    trigger.on_mutations(&batch);
                }
                debug!("Mutation feed closed");
            }));
        }
    }
}

impl Drop for PageSession {
    fn drop(&mut self) {
        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
