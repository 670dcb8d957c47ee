//! Classifier errors.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ClassifierError {
    /// The model could not be loaded, or failed while predicting.
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// The model answered with a score vector that does not line up with its input rows.
    #[error("Invalid model output: expected {expected} scores, got {actual}")]
    InvalidOutput { expected: usize, actual: usize },
}
