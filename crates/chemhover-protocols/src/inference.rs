//! Page-side view of classification.

use async_trait::async_trait;

use crate::error::ChannelError;

/// What the DOM-scanning context can ask of the classifier.
///
/// Implemented both by the cross-context channel client and by the
/// in-process direct path.
#[async_trait]
pub trait Inference: Send + Sync {
    /// Score a batch of raw tokens.
    ///
    /// `Ok(None)` means the batch tokenized to nothing. Otherwise `scores[i]`
    /// belongs to `tokens[i]`.
    async fn predict(&self, tokens: Vec<String>) -> Result<Option<Vec<f32>>, ChannelError>;

    /// Whether the model has finished loading.
    async fn loading_status(&self) -> Result<bool, ChannelError>;
}
