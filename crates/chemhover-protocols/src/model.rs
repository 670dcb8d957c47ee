//! Classifier boundary.
//!
//! The neural model itself is external. These traits describe only what the
//! pipeline needs from it: a one-shot load, then per-batch scoring.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ClassifierError;
use crate::tensor::Tensor;

/// A loaded classifier.
#[async_trait]
pub trait SequenceModel: Send + Sync {
    /// Score every row of `input`.
    ///
    /// The returned vector has exactly `input.rows()` entries, in row order.
    async fn predict(&self, input: &Tensor) -> Result<Vec<f32>, ClassifierError>;
}

/// Fetches a [`SequenceModel`] from wherever its weights live.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    /// Human-readable location of the model, for logs.
    fn source(&self) -> &str;

    /// Fetch and build the model. Called at most once per adapter.
    async fn load(&self) -> Result<Arc<dyn SequenceModel>, ClassifierError>;
}
