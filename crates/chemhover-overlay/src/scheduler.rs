//! Drains the scan queue with bounded concurrency.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

use crate::queue::ScanQueue;
use crate::walker::{ScanOutcome, Walker};

/// Tally of scan outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub scanned: u64,
    pub skipped: u64,
    pub descended: u64,
    pub no_candidates: u64,
    pub no_detections: u64,
    pub detached: u64,
    pub replaced: u64,
    pub overlays: u64,
}

impl ScanReport {
    pub fn record(&mut self, outcome: &ScanOutcome) {
        self.scanned += 1;
        match outcome {
            ScanOutcome::Skipped => self.skipped += 1,
            ScanOutcome::Descended { .. } => self.descended += 1,
            ScanOutcome::NoCandidates => self.no_candidates += 1,
            ScanOutcome::NoDetections => self.no_detections += 1,
            ScanOutcome::Detached => self.detached += 1,
            ScanOutcome::Replaced { overlays } => {
                self.replaced += 1;
                self.overlays += *overlays as u64;
            }
        }
    }

    pub fn merge(&mut self, other: &ScanReport) {
        self.scanned += other.scanned;
        self.skipped += other.skipped;
        self.descended += other.descended;
        self.no_candidates += other.no_candidates;
        self.no_detections += other.no_detections;
        self.detached += other.detached;
        self.replaced += other.replaced;
        self.overlays += other.overlays;
    }
}

/// Runs [`Walker::scan`] for queued nodes, at most `max_concurrent` at once.
///
/// Scans of different nodes interleave freely; each node's own scan is
/// sequential.
pub struct ScanScheduler {
    queue: Arc<ScanQueue>,
    walker: Arc<Walker>,
    permits: Arc<Semaphore>,
    max_concurrent: usize,
    totals: Arc<Mutex<ScanReport>>,
}

impl ScanScheduler {
    pub fn new(queue: Arc<ScanQueue>, walker: Arc<Walker>, max_concurrent: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            queue,
            walker,
            permits: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
            totals: Arc::new(Mutex::new(ScanReport::default())),
        }
    }

    /// Scans running right now.
    pub fn in_progress(&self) -> usize {
        self.max_concurrent - self.permits.available_permits()
    }

    /// Outcomes over the scheduler's lifetime.
    pub fn totals(&self) -> ScanReport {
        *self.totals.lock()
    }

    /// Drain the queue, including everything the scans enqueue, and return
    /// once no scan is left running.
    pub async fn run_until_idle(&self) -> ScanReport {
        let mut report = ScanReport::default();
        let mut tasks = JoinSet::new();

        loop {
            while let Some(node) = self.queue.pop() {
                let Ok(permit) = self.permits.clone().acquire_owned().await else {
                    warn!("Scan permits closed");
                    return report;
                };
                let walker = self.walker.clone();
                tasks.spawn(async move {
                    let outcome = walker.scan(node).await;
                    drop(permit);
                    outcome
                });
            }

            match tasks.join_next().await {
                Some(Ok(outcome)) => {
                    report.record(&outcome);
                    self.totals.lock().record(&outcome);
                }
                Some(Err(e)) => warn!("Scan task failed: {}", e),
                None => break,
            }
        }

        debug!(
            "scan queue idle: {} scanned, {} replaced, {} overlays",
            report.scanned, report.replaced, report.overlays
        );
        report
    }

    /// Scan queued nodes forever on a background task.
    ///
    /// Scans in flight belong to that task: aborting the returned handle
    /// aborts them too.
    pub fn spawn(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!("Scan scheduler started ({} concurrent scans)", self.max_concurrent);
            let mut tasks = JoinSet::new();
            loop {
                tokio::select! {
                    node = self.queue.next() => {
                        let Ok(permit) = self.permits.clone().acquire_owned().await else {
                            warn!("Scan permits closed, stopping scheduler");
                            break;
                        };
                        let walker = self.walker.clone();
                        let totals = self.totals.clone();
                        tasks.spawn(async move {
                            let outcome = walker.scan(node).await;
                            totals.lock().record(&outcome);
                            drop(permit);
                        });
                    }
                    Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                        if let Err(e) = joined {
                            warn!("Scan task failed: {}", e);
                        }
                    }
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
