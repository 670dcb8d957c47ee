//! Classification side of chemhover.
//!
//! Turns token batches into scores and carries them between execution
//! contexts.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐   [kind, id, payload]   ┌────────────────────┐
//! │ InferenceClient  │ ◄─────────────────────► │   InferenceHost    │
//! │  (page context)  │        Port (JSON)      │ (owns the model)   │
//! └──────────────────┘                         └────────────────────┘
//!                                                 │
//!                                        Tokenizer + ClassifierAdapter
//!                                                 │
//!                                          SequenceModel (external)
//! ```
//!
//! Replies are correlated by id, not by position, so the host may answer in
//! any order. [`DirectInference`] is the same contract without the channel,
//! for when the model lives in the page context itself.

mod adapter;
pub mod channel;
mod direct;
pub mod model;
mod tokenizer;
mod vocabulary;

pub use adapter::{AllocationGauge, ClassifierAdapter, Lease};
pub use channel::{InferenceClient, InferenceHost, PendingReply, Port, PortReceiver, PortSender};
pub use direct::DirectInference;
pub use model::{FileModelLoader, HttpModelLoader, NgramArtifact, NgramModel};
pub use tokenizer::Tokenizer;
pub use vocabulary::{Vocabulary, VocabularyError};
