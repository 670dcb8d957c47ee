//! Page-side end of the inference channel.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chemhover_config::ChannelConfig;
use chemhover_protocols::{
    ChannelError, ClassifierError, Envelope, Inference, MessageId, Reply, RequestKind,
};
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

use super::ids::IdAllocator;
use super::port::{Port, PortReceiver, PortSender};

/// Request waiting for its reply.
struct PendingRequest {
    kind: RequestKind,
    tx: oneshot::Sender<Value>,
}

/// State shared between callers and the receive loop.
struct Shared {
    pending: Mutex<HashMap<MessageId, PendingRequest>>,
    ids: Mutex<IdAllocator>,
    stale: AtomicU64,
}

/// Sends classification requests to an [`InferenceHost`](super::InferenceHost)
/// and resolves each caller with the reply carrying its id.
pub struct InferenceClient {
    sender: PortSender,
    shared: Arc<Shared>,
    timeout: Option<Duration>,
    /// Background task handle.
    _recv_task: tokio::task::JoinHandle<()>,
}

impl InferenceClient {
    /// Start the receive loop on `port`. Must be called inside a tokio runtime.
    pub fn connect(port: Port, config: &ChannelConfig) -> Self {
        let (sender, receiver) = port.split();
        let shared = Arc::new(Shared {
            pending: Mutex::new(HashMap::new()),
            ids: Mutex::new(IdAllocator::new(config.max_id)),
            stale: AtomicU64::new(0),
        });

        let recv_task = {
            let shared = shared.clone();
            tokio::spawn(async move {
                Self::receive_loop(receiver, shared).await;
            })
        };

        debug!("Inference client connected (max_id = {})", config.max_id);

        Self {
            sender,
            shared,
            timeout: config.request_timeout_ms.map(Duration::from_millis),
            _recv_task: recv_task,
        }
    }

    async fn receive_loop(mut receiver: PortReceiver, shared: Arc<Shared>) {
        while let Some(frame) = receiver.recv().await {
            trace!("channel recv: {}", frame);
            let envelope = match Envelope::from_frame(&frame) {
                Ok(envelope) => envelope,
                Err(e) => {
                    warn!("Failed to parse channel frame: {}", e);
                    continue;
                }
            };

            let entry = shared.pending.lock().remove(&envelope.id());
            match entry {
                Some(request) => {
                    if request.kind != envelope.kind() {
                        warn!(
                            "Reply {} is {} but the request was {}",
                            envelope.id(),
                            envelope.kind(),
                            request.kind
                        );
                    }
                    let _ = request.tx.send(envelope.into_payload());
                }
                None => {
                    shared.stale.fetch_add(1, Ordering::SeqCst);
                    debug!("Dropping reply for stale id {}", envelope.id());
                }
            }
        }

        // Dropping the senders wakes every waiter with `Closed`.
        let orphaned = std::mem::take(&mut *shared.pending.lock());
        if !orphaned.is_empty() {
            debug!("Channel closed with {} requests in flight", orphaned.len());
        }
    }

    /// Send a request and return its pending reply without waiting for it.
    pub fn request(&self, kind: RequestKind, payload: Value) -> Result<PendingReply, ChannelError> {
        let (tx, rx) = oneshot::channel();

        let id = {
            let mut pending = self.shared.pending.lock();
            let id = self
                .shared
                .ids
                .lock()
                .allocate(|id| pending.contains_key(&id))?;
            pending.insert(id, PendingRequest { kind, tx });
            id
        };

        let sent = Envelope::new(kind, id, payload)
            .to_frame()
            .map_err(ChannelError::from)
            .and_then(|frame| {
                trace!("channel send: {}", frame);
                self.sender.send(frame)
            });
        if let Err(e) = sent {
            self.shared.pending.lock().remove(&id);
            return Err(e);
        }

        Ok(PendingReply {
            id,
            rx,
            timeout: self.timeout,
            shared: self.shared.clone(),
        })
    }

    /// Requests still waiting for a reply.
    pub fn in_flight(&self) -> usize {
        self.shared.pending.lock().len()
    }

    /// Replies dropped because no request was waiting on their id.
    pub fn stale_replies(&self) -> u64 {
        self.shared.stale.load(Ordering::SeqCst)
    }
}

impl Drop for InferenceClient {
    fn drop(&mut self) {
        self._recv_task.abort();
    }
}

#[async_trait]
impl Inference for InferenceClient {
    async fn predict(&self, tokens: Vec<String>) -> Result<Option<Vec<f32>>, ChannelError> {
        let payload = serde_json::to_value(&tokens)?;
        let value = self.request(RequestKind::Predict, payload)?.wait().await?;

        match Reply::from_value(value.clone()) {
            Ok(Reply::Scores(scores)) => Ok(Some(scores)),
            Ok(Reply::Empty) => Ok(None),
            Ok(Reply::Failed { error }) => Err(ClassifierError::ModelUnavailable(error).into()),
            _ => Err(ChannelError::UnexpectedReply {
                kind: RequestKind::Predict.to_string(),
                payload: value.to_string(),
            }),
        }
    }

    async fn loading_status(&self) -> Result<bool, ChannelError> {
        let value = self
            .request(RequestKind::LoadingStatus, Value::Null)?
            .wait()
            .await?;

        match value {
            Value::Bool(loaded) => Ok(loaded),
            other => Err(ChannelError::UnexpectedReply {
                kind: RequestKind::LoadingStatus.to_string(),
                payload: other.to_string(),
            }),
        }
    }
}

/// Handle to one in-flight request.
pub struct PendingReply {
    id: MessageId,
    rx: oneshot::Receiver<Value>,
    timeout: Option<Duration>,
    shared: Arc<Shared>,
}

impl PendingReply {
    /// Correlation id this request was sent with.
    pub fn id(&self) -> MessageId {
        self.id
    }

    /// Wait for the reply payload.
    pub async fn wait(self) -> Result<Value, ChannelError> {
        let Some(timeout) = self.timeout else {
            return self.rx.await.map_err(|_| ChannelError::Closed);
        };

        match tokio::time::timeout(timeout, self.rx).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(_)) => Err(ChannelError::Closed),
            Err(_) => {
                self.shared.pending.lock().remove(&self.id);
                Err(ChannelError::Timeout {
                    id: self.id,
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
