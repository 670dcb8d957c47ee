//! Page side of chemhover.
//!
//! Finds words in a live [`Document`] that the classifier scores as chemical
//! notations and swaps them for hoverable overlays.
//!
//! ```text
//! Trigger ──► ScanQueue ──► ScanScheduler ──► Walker ──► Inference
//!   ▲ (mutations,                               │
//!   │  selection)                               ▼
//!   └──────────── Document ◄──── OverlayRegistry (allocate, hookup)
//! ```
//!
//! [`PageSession`] wires these together for one page.

pub mod dom;
pub mod overlay;
mod queue;
mod scheduler;
mod session;
mod trigger;
pub mod walker;

pub use dom::{Document, NodeId, SharedDocument};
pub use overlay::{OverlayRegistry, OverlaySettings, SvgLabelRenderer};
pub use queue::ScanQueue;
pub use scheduler::{ScanReport, ScanScheduler};
pub use session::{Injection, PageSession};
pub use trigger::Trigger;
pub use walker::{ScanOutcome, Walker, WalkerSettings};
