//! Character vocabulary used by the tokenizer.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Id for characters missing from the table. Shares its value with padding.
pub const UNKNOWN_ID: i32 = 0;

/// Characters the built-in table knows, in id order starting at 1.
const BUILTIN_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz0123456789()[]=#@+-/\\.%:,'*$~";

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("Vocabulary JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Vocabulary key {0:?} is not a single character")]
    InvalidKey(String),

    #[error("Vocabulary id {value:?} for {key:?} is not an integer")]
    InvalidId { key: String, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Published tables store ids as strings; accept both.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Text(String),
}

#[derive(Deserialize)]
struct RawVocabulary {
    stoi: HashMap<String, RawId>,
}

/// Fixed char -> id table. Lookups are case-insensitive.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    stoi: HashMap<char, i32>,
}

impl Vocabulary {
    /// The table compiled into the crate.
    pub fn builtin() -> Self {
        let stoi = BUILTIN_ALPHABET
            .chars()
            .enumerate()
            .map(|(i, c)| (c, i as i32 + 1))
            .collect();
        Self { stoi }
    }

    /// Parse a `{"stoi": {"a": 1, "b": "2", ...}}` table.
    pub fn from_json(content: &str) -> Result<Self, VocabularyError> {
        let raw: RawVocabulary = serde_json::from_str(content)?;
        let mut stoi = HashMap::with_capacity(raw.stoi.len());

        for (key, value) in raw.stoi {
            let mut chars = key.chars();
            let c = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => return Err(VocabularyError::InvalidKey(key)),
            };
            let id = match value {
                RawId::Int(n) => i32::try_from(n).map_err(|_| VocabularyError::InvalidId {
                    key: key.clone(),
                    value: n.to_string(),
                })?,
                RawId::Text(s) => s.trim().parse::<i32>().map_err(|_| VocabularyError::InvalidId {
                    key: key.clone(),
                    value: s.clone(),
                })?,
            };
            stoi.insert(c, id);
        }

        Ok(Self { stoi })
    }

    /// Read a JSON table from disk.
    pub async fn from_file(path: &Path) -> Result<Self, VocabularyError> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::from_json(&content)
    }

    /// Id of `c` after lower-casing.
    ///
    /// A character whose lower case form is more than one character is unknown.
    pub fn id_of(&self, c: char) -> i32 {
        let mut lower = c.to_lowercase();
        match (lower.next(), lower.next()) {
            (Some(l), None) => self.stoi.get(&l).copied().unwrap_or(UNKNOWN_ID),
            _ => UNKNOWN_ID,
        }
    }

    /// Reverse lookup, mostly for diagnostics.
    pub fn char_of(&self, id: i32) -> Option<char> {
        self.stoi
            .iter()
            .find_map(|(&c, &v)| (v == id).then_some(c))
    }

    pub fn len(&self) -> usize {
        self.stoi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stoi.is_empty()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}
