//! Character n-gram linear scorer.

use std::collections::HashMap;

use async_trait::async_trait;
use chemhover_protocols::{ClassifierError, SequenceModel, Tensor};
use serde::{Deserialize, Serialize};

/// Serialized form of an [`NgramModel`].
///
/// JSON object keys are strings, so unigram keys are ids (`"12"`) and bigram
/// keys are comma-separated id pairs (`"12,27"`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NgramArtifact {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bias: f32,
    #[serde(default)]
    pub unigram: HashMap<String, f32>,
    #[serde(default)]
    pub bigram: HashMap<String, f32>,
    /// Divide the summed weights by the token length before adding the bias.
    #[serde(default)]
    pub normalize: bool,
}

/// Scores a row as `bias + sum(unigram) + sum(bigram)` over its non-zero ids.
#[derive(Debug, Clone)]
pub struct NgramModel {
    bias: f32,
    unigram: HashMap<i32, f32>,
    bigram: HashMap<(i32, i32), f32>,
    normalize: bool,
}

fn parse_id(key: &str) -> Result<i32, ClassifierError> {
    key.trim()
        .parse()
        .map_err(|_| ClassifierError::ModelUnavailable(format!("bad n-gram key {:?}", key)))
}

impl NgramModel {
    pub fn from_artifact(artifact: NgramArtifact) -> Result<Self, ClassifierError> {
        let unigram = artifact
            .unigram
            .iter()
            .map(|(k, &w)| Ok((parse_id(k)?, w)))
            .collect::<Result<HashMap<_, _>, ClassifierError>>()?;

        let bigram = artifact
            .bigram
            .iter()
            .map(|(k, &w)| {
                let (a, b) = k.split_once(',').ok_or_else(|| {
                    ClassifierError::ModelUnavailable(format!("bad bigram key {:?}", k))
                })?;
                Ok(((parse_id(a)?, parse_id(b)?), w))
            })
            .collect::<Result<HashMap<_, _>, ClassifierError>>()?;

        Ok(Self {
            bias: artifact.bias,
            unigram,
            bigram,
            normalize: artifact.normalize,
        })
    }

    pub fn from_json(content: &str) -> Result<Self, ClassifierError> {
        let artifact: NgramArtifact = serde_json::from_str(content)
            .map_err(|e| ClassifierError::ModelUnavailable(format!("bad model artifact: {}", e)))?;
        Self::from_artifact(artifact)
    }

    /// Score one padded row. Id 0 (padding or unknown) carries no weight.
    pub fn score_row(&self, row: &[i32]) -> f32 {
        let ids: Vec<i32> = row.iter().copied().filter(|&id| id != Tensor::PADDING).collect();
        if ids.is_empty() {
            return self.bias;
        }

        let uni: f32 = ids.iter().filter_map(|id| self.unigram.get(id)).sum();
        let bi: f32 = ids
            .windows(2)
            .filter_map(|w| self.bigram.get(&(w[0], w[1])))
            .sum();

        let total = uni + bi;
        if self.normalize {
            self.bias + total / ids.len() as f32
        } else {
            self.bias + total
        }
    }
}

#[async_trait]
impl SequenceModel for NgramModel {
    async fn predict(&self, input: &Tensor) -> Result<Vec<f32>, ClassifierError> {
        Ok(input.iter_rows().map(|row| self.score_row(row)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> NgramModel {
        NgramModel::from_json(
            r#"{
                "bias": -1.0,
                "unigram": {"1": 0.5, "2": 0.25},
                "bigram": {"1,2": 1.0}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_score_row_sums_weights() {
        let m = model();
        // -1 + 0.5 + 0.25 + 1.0
        assert!((m.score_row(&[1, 2]) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_padding_carries_no_weight() {
        let m = model();
        assert_eq!(m.score_row(&[1, 2, 0, 0]), m.score_row(&[1, 2]));
        assert_eq!(m.score_row(&[0, 0]), -1.0);
    }

    #[test]
    fn test_normalize_divides_by_length() {
        let mut m = model();
        m.normalize = true;
        // -1 + (0.5 + 0.25 + 1.0) / 2
        assert!((m.score_row(&[1, 2]) - (-0.125)).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_predict_one_score_per_row() {
        let m = model();
        let tensor = Tensor::from_rows(&[vec![1, 2], vec![2]]).unwrap();
        let scores = m.predict(&tensor).await.unwrap();
        assert_eq!(scores.len(), 2);
        assert!(scores[0] > scores[1]);
    }

    #[test]
    fn test_bad_bigram_key() {
        let err = NgramModel::from_json(r#"{"bigram": {"12": 1.0}}"#).unwrap_err();
        assert!(matches!(err, ClassifierError::ModelUnavailable(_)));
    }

    #[test]
    fn test_bad_json() {
        assert!(NgramModel::from_json("<html>not a model</html>").is_err());
    }
}
