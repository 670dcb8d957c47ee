//! In-context inference without a channel.

use std::sync::Arc;

use async_trait::async_trait;
use chemhover_protocols::{ChannelError, Inference};

use crate::adapter::ClassifierAdapter;
use crate::tokenizer::Tokenizer;

/// Calls the adapter directly, for when the model lives in the same context
/// as the walker.
pub struct DirectInference {
    adapter: Arc<ClassifierAdapter>,
    tokenizer: Arc<Tokenizer>,
}

impl DirectInference {
    pub fn new(adapter: Arc<ClassifierAdapter>, tokenizer: Arc<Tokenizer>) -> Self {
        Self { adapter, tokenizer }
    }
}

#[async_trait]
impl Inference for DirectInference {
    async fn predict(&self, tokens: Vec<String>) -> Result<Option<Vec<f32>>, ChannelError> {
        Ok(self.adapter.classify(&self.tokenizer, &tokens).await?)
    }

    async fn loading_status(&self) -> Result<bool, ChannelError> {
        Ok(self.adapter.is_loaded())
    }
}
