//! Inference channel errors.

use thiserror::Error;

use super::ClassifierError;

#[derive(Debug, Error)]
pub enum ChannelError {
    /// The port was closed before a reply arrived.
    #[error("Channel closed")]
    Closed,

    /// Every correlation id below the bound is still waiting for a reply.
    #[error("No free correlation id: all {max_id} ids are in flight")]
    IdSpaceExhausted { max_id: u32 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The remote side answered with a payload that does not fit the request kind.
    #[error("Unexpected reply for {kind}: {payload}")]
    UnexpectedReply { kind: String, payload: String },

    #[error("Request {id} timed out after {timeout_ms}ms")]
    Timeout { id: u32, timeout_ms: u64 },

    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

impl ChannelError {
    /// Whether this failure means "the model cannot help right now".
    ///
    /// Callers in the page context treat these as a pass with no detections.
    pub fn is_model_unavailable(&self) -> bool {
        matches!(
            self,
            ChannelError::Classifier(ClassifierError::ModelUnavailable(_))
        )
    }
}

#[cfg(test)]
#[path = "channel_tests.rs"]
mod tests;
