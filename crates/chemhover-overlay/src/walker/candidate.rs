//! Candidate token extraction.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").expect("static pattern"));

/// Leading quotes/brackets and trailing quotes/brackets/periods around a word.
static ENCLOSED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^[("'\[]*(.*?)[."'\])]*$"#).expect("static pattern"));

/// One whitespace-delimited word of a text node.
///
/// Spans are byte ranges into the node's content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    surface: Range<usize>,
    inner: Range<usize>,
}

impl Candidate {
    /// The word as it appears in the text.
    pub fn surface(&self) -> Range<usize> {
        self.surface.clone()
    }

    /// The word without enclosing punctuation; what gets classified.
    pub fn inner(&self) -> Range<usize> {
        self.inner.clone()
    }

    pub fn surface_str<'a>(&self, content: &'a str) -> &'a str {
        &content[self.surface()]
    }

    pub fn inner_str<'a>(&self, content: &'a str) -> &'a str {
        &content[self.inner()]
    }

    /// Accepted when the surface form is longer than one character, something
    /// is left after stripping, and the score is strictly above `threshold`.
    pub fn accepts(&self, content: &str, score: f32, threshold: f32) -> bool {
        self.surface_str(content).chars().count() > 1 && !self.inner.is_empty() && score > threshold
    }
}

/// Split `content` on whitespace and strip enclosing punctuation from each
/// word, in textual order.
pub fn extract(content: &str) -> Vec<Candidate> {
    WORD.find_iter(content)
        .map(|word| {
            let inner = ENCLOSED
                .captures(word.as_str())
                .and_then(|caps| caps.get(1))
                .map(|m| word.start() + m.start()..word.start() + m.end())
                .unwrap_or_else(|| word.range());
            Candidate {
                surface: word.range(),
                inner,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inners(content: &str) -> Vec<&str> {
        extract(content).iter().map(|c| c.inner_str(content)).collect()
    }

    #[test]
    fn test_splits_on_any_whitespace() {
        assert_eq!(inners("water is H2O"), vec!["water", "is", "H2O"]);
        assert_eq!(inners("  a\t\tb\n c  "), vec!["a", "b", "c"]);
        assert!(extract("").is_empty());
        assert!(extract(" \n\t ").is_empty());
    }

    #[test]
    fn test_strips_enclosing_punctuation() {
        assert_eq!(inners("(H2O)"), vec!["H2O"]);
        assert_eq!(inners("\"NaCl\"."), vec!["NaCl"]);
        assert_eq!(inners("['CO2']"), vec!["CO2"]);
        assert_eq!(inners("H2SO4."), vec!["H2SO4"]);
    }

    #[test]
    fn test_inner_punctuation_is_kept() {
        assert_eq!(inners("C(=O)O"), vec!["C(=O)O"]);
        assert_eq!(inners("[Na+].[Cl-]"), vec!["Na+].[Cl-"]);
    }

    #[test]
    fn test_every_word_is_stripped() {
        // Consecutive words all go through the pattern, not every other one.
        assert_eq!(inners("(a) (b) (c) (d)"), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_spans_point_into_content() {
        let content = "see (CH4).";
        let candidates = extract(content);
        assert_eq!(candidates[1].surface(), 4..10);
        assert_eq!(candidates[1].surface_str(content), "(CH4).");
        assert_eq!(candidates[1].inner(), 5..8);
        assert_eq!(candidates[1].inner_str(content), "CH4");
    }

    #[test]
    fn test_multibyte_spans() {
        let content = "é «H₂O»";
        let candidates = extract(content);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].inner_str(content), "«H₂O»");
    }

    #[test]
    fn test_punctuation_only_word_has_empty_inner() {
        let content = "...";
        let candidates = extract(content);
        assert_eq!(candidates.len(), 1);
        assert!(candidates[0].inner().is_empty());
        assert!(!candidates[0].accepts(content, 99.0, 0.0));
    }

    #[test]
    fn test_accepts_is_strict() {
        let content = "H2O";
        let candidate = &extract(content)[0];
        assert!(!candidate.accepts(content, 0.5, 0.5));
        assert!(candidate.accepts(content, 0.500_001, 0.5));
        assert!(!candidate.accepts(content, f32::NAN, 0.5));
    }

    #[test]
    fn test_single_character_surface_never_accepted() {
        let content = "a";
        let candidate = &extract(content)[0];
        assert!(!candidate.accepts(content, 10.0, 0.0));

        // Two surface characters, one inner: the surface length decides.
        let content = "(a";
        let candidate = &extract(content)[0];
        assert_eq!(candidate.inner_str(content), "a");
        assert!(candidate.accepts(content, 10.0, 0.0));
    }
}
