//! # Chemhover Protocols
//!
//! Shared contracts for the chemhover overlay pipeline.
//! Contains interface definitions and plain data types only - no implementations.
//!
//! ## Core Traits
//!
//! - [`SequenceModel`] - The external classifier: id grid in, one score per row out
//! - [`ModelLoader`] - One-shot fetch of a [`SequenceModel`]
//! - [`Inference`] - `predict` / `loading_status` as seen by the page context
//! - [`StructureRenderer`] - Opaque depiction of a notation string
//!
//! ## Wire Format
//!
//! Requests and replies cross the inference channel as a JSON array
//! `[kind, id, payload]`, see [`Envelope`].

pub mod error;
pub mod inference;
pub mod message;
pub mod model;
pub mod render;
pub mod tensor;

pub use error::{ChannelError, ClassifierError, DomError, RenderError};
pub use inference::Inference;
pub use message::{Envelope, MessageId, Reply, RequestKind};
pub use model::{ModelLoader, SequenceModel};
pub use render::{Depiction, Palette, StructureRenderer, SurfaceSpec};
pub use tensor::Tensor;
