//! Model-side end of the inference channel.

use std::sync::Arc;

use chemhover_protocols::{Envelope, Reply, RequestKind};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use super::port::{Port, PortSender};
use crate::adapter::ClassifierAdapter;
use crate::tokenizer::Tokenizer;

/// Answers requests arriving on a [`Port`].
///
/// Each request is handled on its own task, so a slow batch never holds up a
/// `loading-status` query behind it. Every request gets exactly one reply with
/// the id it was sent with.
pub struct InferenceHost {
    adapter: Arc<ClassifierAdapter>,
    tokenizer: Arc<Tokenizer>,
}

impl InferenceHost {
    pub fn new(adapter: Arc<ClassifierAdapter>, tokenizer: Arc<Tokenizer>) -> Self {
        Self { adapter, tokenizer }
    }

    pub fn adapter(&self) -> &Arc<ClassifierAdapter> {
        &self.adapter
    }

    /// Compute the reply for one request.
    pub async fn handle(&self, kind: RequestKind, payload: Value) -> Reply {
        match kind {
            RequestKind::LoadingStatus => Reply::Status(self.adapter.is_loaded()),
            RequestKind::Predict => {
                let tokens: Vec<String> = match serde_json::from_value(payload) {
                    Ok(tokens) => tokens,
                    Err(e) => {
                        warn!("Malformed predict payload: {}", e);
                        return Reply::Failed {
                            error: format!("malformed predict payload: {}", e),
                        };
                    }
                };

                match self.adapter.classify(&self.tokenizer, &tokens).await {
                    Ok(Some(scores)) => Reply::Scores(scores),
                    Ok(None) => Reply::Empty,
                    Err(e) => Reply::Failed {
                        error: e.to_string(),
                    },
                }
            }
        }
    }

    /// Serve requests until the client end of `port` goes away.
    pub async fn serve(self: Arc<Self>, port: Port) {
        let (sender, mut receiver) = port.split();
        info!("Inference host serving");

        while let Some(frame) = receiver.recv().await {
            trace!("host recv: {}", frame);
            let envelope = match Envelope::from_frame(&frame) {
                Ok(envelope) => envelope,
                Err(e) => {
                    warn!("Ignoring malformed request frame: {}", e);
                    continue;
                }
            };

            let host = self.clone();
            let sender = sender.clone();
            tokio::spawn(async move {
                host.answer(envelope, &sender).await;
            });
        }

        debug!("Inference host port closed");
    }

    /// Run [`serve`](Self::serve) on a background task.
    pub fn spawn(self: Arc<Self>, port: Port) -> JoinHandle<()> {
        tokio::spawn(self.serve(port))
    }

    async fn answer(&self, request: Envelope, sender: &PortSender) {
        let kind = request.kind();
        let id = request.id();
        let reply = self.handle(kind, request.into_payload()).await;

        let frame = match Envelope::new(kind, id, reply.to_value()).to_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Failed to encode reply {}: {}", id, e);
                return;
            }
        };
        if sender.send(frame).is_err() {
            debug!("Client went away before reply {} was sent", id);
        }
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
