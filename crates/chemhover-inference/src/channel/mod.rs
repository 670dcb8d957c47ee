//! Cross-context inference channel.
//!
//! A single long-lived [`Port`] pair connects the page context
//! ([`InferenceClient`]) with the context that owns the model
//! ([`InferenceHost`]). Frames are JSON text `[kind, id, payload]`.

mod client;
mod host;
mod ids;
mod port;

pub use client::{InferenceClient, PendingReply};
pub use host::InferenceHost;
pub use port::{pair, Port, PortReceiver, PortSender};
