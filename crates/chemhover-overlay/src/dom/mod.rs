//! Minimal live document the walker reads and rewrites.

mod document;
mod event;
pub mod html;

pub use document::{Document, NodeId, NodeKind, SharedDocument};
pub use event::{
    MutationObserver, MutationRecord, PointerAction, PointerBinding, PointerEvent, Selection,
};
