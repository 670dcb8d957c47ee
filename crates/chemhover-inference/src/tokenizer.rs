//! Token batch -> padded id grid.

use std::sync::Arc;

use chemhover_protocols::Tensor;

use crate::vocabulary::Vocabulary;

/// Maps strings through a [`Vocabulary`] into a [`Tensor`].
///
/// Pure and deterministic for a fixed vocabulary.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    vocabulary: Arc<Vocabulary>,
}

impl Tokenizer {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self { vocabulary }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Ids for one string, one per character.
    pub fn encode(&self, s: &str) -> Vec<i32> {
        s.chars().map(|c| self.vocabulary.id_of(c)).collect()
    }

    /// Encode a batch into a `(batch_size, max_len)` grid.
    ///
    /// Returns `None` when every string is empty, so callers can skip the
    /// classifier entirely.
    pub fn tokenize<S: AsRef<str>>(&self, strings: &[S]) -> Option<Tensor> {
        let rows: Vec<Vec<i32>> = strings.iter().map(|s| self.encode(s.as_ref())).collect();
        Tensor::from_rows(&rows)
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(Arc::new(Vocabulary::builtin()))
    }
}

#[cfg(test)]
#[path = "tokenizer_tests.rs"]
mod tests;
