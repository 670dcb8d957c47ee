//! Classifier adapter: lazy, memoized model load plus scoped per-call buffers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chemhover_protocols::{ClassifierError, ModelLoader, SequenceModel, Tensor};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::tokenizer::Tokenizer;

type LoadResult = Result<Arc<dyn SequenceModel>, ClassifierError>;

/// Tracks buffers acquired during a predict call.
///
/// Every [`Lease`] is released when dropped, so the live count returns to zero
/// after each call whether it succeeded or not.
#[derive(Debug, Default)]
pub struct AllocationGauge {
    live: AtomicUsize,
    live_bytes: AtomicUsize,
    peak_bytes: AtomicUsize,
}

impl AllocationGauge {
    /// Acquire a lease covering `bytes`.
    pub fn lease(&self, bytes: usize) -> Lease<'_> {
        self.live.fetch_add(1, Ordering::SeqCst);
        let now = self.live_bytes.fetch_add(bytes, Ordering::SeqCst) + bytes;
        self.peak_bytes.fetch_max(now, Ordering::SeqCst);
        Lease { gauge: self, bytes }
    }

    /// Leases currently held.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn live_bytes(&self) -> usize {
        self.live_bytes.load(Ordering::SeqCst)
    }

    /// High-water mark of simultaneously leased bytes.
    pub fn peak_bytes(&self) -> usize {
        self.peak_bytes.load(Ordering::SeqCst)
    }
}

/// Scoped claim on an [`AllocationGauge`].
#[derive(Debug)]
pub struct Lease<'a> {
    gauge: &'a AllocationGauge,
    bytes: usize,
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        self.gauge.live.fetch_sub(1, Ordering::SeqCst);
        self.gauge.live_bytes.fetch_sub(self.bytes, Ordering::SeqCst);
    }
}

/// Wraps the external model.
///
/// The first caller triggers the load; concurrent first callers wait on the
/// same in-flight load. A failed load is remembered, and every later call fails
/// fast with [`ClassifierError::ModelUnavailable`].
pub struct ClassifierAdapter {
    loader: Arc<dyn ModelLoader>,
    model: OnceCell<LoadResult>,
    gauge: AllocationGauge,
}

impl ClassifierAdapter {
    pub fn new(loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            loader,
            model: OnceCell::new(),
            gauge: AllocationGauge::default(),
        }
    }

    /// Load the model if nobody has yet.
    pub async fn ensure_loaded(&self) -> Result<(), ClassifierError> {
        self.model().await.map(|_| ())
    }

    /// Whether a load finished successfully.
    pub fn is_loaded(&self) -> bool {
        matches!(self.model.get(), Some(Ok(_)))
    }

    pub fn gauge(&self) -> &AllocationGauge {
        &self.gauge
    }

    async fn model(&self) -> LoadResult {
        self.model
            .get_or_init(|| async {
                info!(source = self.loader.source(), "Loading classifier model");
                match self.loader.load().await {
                    Ok(model) => {
                        info!(source = self.loader.source(), "Classifier model loaded");
                        Ok(model)
                    }
                    Err(e) => {
                        warn!(source = self.loader.source(), "Classifier model failed to load: {}", e);
                        Err(e)
                    }
                }
            })
            .await
            .clone()
    }

    /// Score every row of `input`, loading the model on first use.
    pub async fn predict(&self, input: &Tensor) -> Result<Vec<f32>, ClassifierError> {
        let model = self.model().await?;

        let _input = self.gauge.lease(input.byte_len());
        let scores = model.predict(input).await?;
        let _output = self.gauge.lease(scores.len() * std::mem::size_of::<f32>());

        if scores.len() != input.rows() {
            return Err(ClassifierError::InvalidOutput {
                expected: input.rows(),
                actual: scores.len(),
            });
        }
        Ok(scores)
    }

    /// Tokenize and score a raw token batch.
    ///
    /// `Ok(None)` when the batch has no characters at all.
    pub async fn classify(
        &self,
        tokenizer: &Tokenizer,
        tokens: &[String],
    ) -> Result<Option<Vec<f32>>, ClassifierError> {
        let Some(tensor) = tokenizer.tokenize(tokens) else {
            debug!("Batch of {} tokens is empty after tokenization", tokens.len());
            return Ok(None);
        };
        let _tensor = self.gauge.lease(tensor.byte_len());
        self.predict(&tensor).await.map(Some)
    }
}

#[cfg(test)]
#[path = "adapter_tests.rs"]
mod tests;
