//! Model selection and the offline fallback model.

use std::sync::Arc;

use async_trait::async_trait;
use chemhover_config::Config;
use chemhover_inference::{FileModelLoader, HttpModelLoader, Tokenizer, Vocabulary};
use chemhover_protocols::{ClassifierError, ModelLoader, SequenceModel, Tensor};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::info;

/// Score for rows shaped like a formula. Above the default threshold.
const FORMULA_SCORE: f32 = 2.0;
const OTHER_SCORE: f32 = -2.0;

/// Lowercased formula shape: element-ish letter runs, counts, and groups.
static FORMULA_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z(\[][a-z0-9()\[\]]*$").expect("static pattern"));
static LETTER_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]+").expect("static pattern"));

/// Scores rows without a trained model.
///
/// The tokenizer lowercases, so only shape is visible: a word counts as a
/// formula when it mixes letters and digits and no letter run is longer than
/// four characters.
pub(crate) struct FormulaHeuristic {
    vocabulary: Arc<Vocabulary>,
}

impl FormulaHeuristic {
    pub(crate) fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self { vocabulary }
    }

    fn decode(&self, row: &[i32]) -> String {
        row.iter()
            .filter(|&&id| id != 0)
            .filter_map(|&id| self.vocabulary.char_of(id))
            .collect()
    }

    pub(crate) fn score_word(word: &str) -> f32 {
        let looks_like_formula = FORMULA_SHAPE.is_match(word)
            && word.chars().any(|c| c.is_ascii_digit())
            && LETTER_RUN.find_iter(word).all(|run| run.as_str().len() <= 4);
        if looks_like_formula {
            FORMULA_SCORE
        } else {
            OTHER_SCORE
        }
    }
}

#[async_trait]
impl SequenceModel for FormulaHeuristic {
    async fn predict(&self, input: &Tensor) -> Result<Vec<f32>, ClassifierError> {
        Ok(input
            .iter_rows()
            .map(|row| Self::score_word(&self.decode(row)))
            .collect())
    }
}

/// Hands out a [`FormulaHeuristic`]; never fails.
pub(crate) struct HeuristicLoader {
    vocabulary: Arc<Vocabulary>,
}

impl HeuristicLoader {
    pub(crate) fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self { vocabulary }
    }
}

#[async_trait]
impl ModelLoader for HeuristicLoader {
    fn source(&self) -> &str {
        "builtin://formula-heuristic"
    }

    async fn load(&self) -> Result<Arc<dyn SequenceModel>, ClassifierError> {
        Ok(Arc::new(FormulaHeuristic::new(self.vocabulary.clone())))
    }
}

/// Vocabulary from `classifier.vocabulary_path`, or the built-in table.
pub(crate) async fn load_vocabulary(config: &Config) -> anyhow::Result<Arc<Vocabulary>> {
    let vocabulary = match &config.classifier.vocabulary_path {
        Some(path) => Vocabulary::from_file(path).await?,
        None => Vocabulary::builtin(),
    };
    Ok(Arc::new(vocabulary))
}

pub(crate) fn tokenizer(vocabulary: Arc<Vocabulary>) -> Arc<Tokenizer> {
    Arc::new(Tokenizer::new(vocabulary))
}

/// Local artifact first, then URL, then the offline heuristic.
pub(crate) fn model_loader(config: &Config, vocabulary: Arc<Vocabulary>) -> Arc<dyn ModelLoader> {
    let loader: Arc<dyn ModelLoader> = if let Some(path) = &config.classifier.model_path {
        Arc::new(FileModelLoader::new(path.clone()))
    } else if let Some(url) = &config.classifier.model_url {
        Arc::new(HttpModelLoader::new(url.clone()))
    } else {
        Arc::new(HeuristicLoader::new(vocabulary))
    };
    info!("Model source: {}", loader.source());
    loader
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_heuristic_scores() {
        for word in ["h2o", "h2so4", "c6h12o6", "ca(oh)2", "cl2"] {
            assert_eq!(FormulaHeuristic::score_word(word), FORMULA_SCORE, "{}", word);
        }
        for word in ["water", "is", "covid19", "2024", "nacl", ""] {
            assert_eq!(FormulaHeuristic::score_word(word), OTHER_SCORE, "{}", word);
        }
    }

    #[test]
    fn test_heuristic_letter_run_limit_is_four() {
        assert_eq!(FormulaHeuristic::score_word("nacl2"), FORMULA_SCORE);
        assert_eq!(FormulaHeuristic::score_word("naclo4"), OTHER_SCORE);
    }

    #[tokio::test]
    async fn test_heuristic_reads_tokenized_rows() {
        let vocabulary = Arc::new(Vocabulary::builtin());
        let tokenizer = Tokenizer::new(vocabulary.clone());
        let model = FormulaHeuristic::new(vocabulary);

        let input = tokenizer.tokenize(&["Water", "H2O", "is"]).unwrap();
        let scores = model.predict(&input).await.unwrap();
        assert_eq!(scores, vec![OTHER_SCORE, FORMULA_SCORE, OTHER_SCORE]);
    }

    #[test]
    fn test_model_loader_precedence() {
        let vocabulary = Arc::new(Vocabulary::builtin());
        let mut config = Config::default();
        assert_eq!(
            model_loader(&config, vocabulary.clone()).source(),
            "builtin://formula-heuristic"
        );

        config.classifier.model_url = Some("https://models.example.org/m.json".to_string());
        assert_eq!(
            model_loader(&config, vocabulary.clone()).source(),
            "https://models.example.org/m.json"
        );

        config.classifier.model_path = Some(PathBuf::from("/opt/model.json"));
        assert_eq!(model_loader(&config, vocabulary).source(), "/opt/model.json");
    }
}
