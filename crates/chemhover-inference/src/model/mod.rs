//! Model artifacts the adapter knows how to load.

mod loader;
mod ngram;

pub use loader::{FileModelLoader, HttpModelLoader};
pub use ngram::{NgramArtifact, NgramModel};
