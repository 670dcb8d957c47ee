//! Structure renderer errors.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The notation could not be parsed into a structure.
    #[error("Cannot parse notation {notation:?}: {reason}")]
    Parse { notation: String, reason: String },

    #[error("Render failed: {0}")]
    Failed(String),
}
