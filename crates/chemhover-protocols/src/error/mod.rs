//! Error types shared across the chemhover crates.
//!
//! Every condition here is recovered locally by the pipeline. None of them
//! reaches the page as a visible failure.

mod channel;
mod classifier;
mod dom;
mod render;

pub use channel::*;
pub use classifier::*;
pub use dom::*;
pub use render::*;
