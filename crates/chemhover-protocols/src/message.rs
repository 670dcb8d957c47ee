//! Inference channel wire format.
//!
//! Every frame is a JSON array `[kind, id, payload]`. Requests and replies use
//! the same shape; the id correlates a reply with the request it answers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Correlation id of one in-flight request.
pub type MessageId = u32;

/// What a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKind {
    #[serde(rename = "predict")]
    Predict,
    #[serde(rename = "loading-status")]
    LoadingStatus,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Predict => "predict",
            RequestKind::LoadingStatus => "loading-status",
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One frame on the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope(pub RequestKind, pub MessageId, pub Value);

impl Envelope {
    pub fn new(kind: RequestKind, id: MessageId, payload: Value) -> Self {
        Self(kind, id, payload)
    }

    pub fn kind(&self) -> RequestKind {
        self.0
    }

    pub fn id(&self) -> MessageId {
        self.1
    }

    pub fn payload(&self) -> &Value {
        &self.2
    }

    pub fn into_payload(self) -> Value {
        self.2
    }

    /// Encode as a text frame.
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a text frame.
    pub fn from_frame(frame: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(frame)
    }
}

/// Reply payloads the host can send back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    /// Answer to `loading-status`.
    Status(bool),
    /// Answer to `predict`: one score per submitted token.
    Scores(Vec<f32>),
    /// The host could not classify the batch.
    Failed { error: String },
    /// The batch tokenized to nothing.
    Empty,
}

impl Reply {
    pub fn to_value(&self) -> Value {
        // Plain data; serialization into a Value cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
