//! Text analysis engine: article text in, vocabulary out.
//!
//! The stages run strictly in order and only [`validate`] may refuse input;
//! everything after it assumes validated, non-empty text.
//!
//! 1. [`validate`]: reject empty, tiny, huge, repetitive, or letter-poor text
//! 2. [`normalize`]: lowercase, fold accents, strip symbols, collapse spaces
//! 3. [`tokenize`]: keep vocabulary-worthy tokens (length, numeric, junk, stopwords)
//! 4. [`count_frequencies`]: tally and drop runaway repetitions
//! 5. [`extract_contexts`]: first example sentence per surviving word

pub mod context;
pub mod frequency;
pub mod normalize;
pub mod stopwords;
pub mod validate;

pub use context::extract_contexts;
pub use frequency::{count_frequencies, tokenize};
pub use normalize::normalize;
pub use validate::validate;

use crate::config::AnalysisSettings;
use crate::error::Rejection;
use crate::models::{WordContexts, WordFrequencies};
use std::collections::HashSet;
use tracing::debug;

/// Result of analysing one article's text.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub frequencies: WordFrequencies,
    pub contexts: WordContexts,
    /// Number of tokens that survived filtering, before the frequency cap.
    pub token_count: usize,
}

/// Holds the stopword and junk sets for a run.
#[derive(Debug, Clone)]
pub struct TextAnalyzer {
    stopwords: HashSet<String>,
    junk: HashSet<String>,
}

impl Default for TextAnalyzer {
    fn default() -> Self {
        Self::new(&AnalysisSettings::default())
    }
}

impl TextAnalyzer {
    /// Built-in lists merged with the configured extras, all in normalized form.
    pub fn new(settings: &AnalysisSettings) -> Self {
        let stopwords = stopwords::FRENCH_STOPWORDS
            .iter()
            .copied()
            .chain(settings.extra_stopwords.iter().map(String::as_str))
            .map(normalize)
            .filter(|w| !w.is_empty())
            .collect();
        let junk = stopwords::JUNK_WORDS
            .iter()
            .copied()
            .chain(settings.junk_patterns.iter().map(String::as_str))
            .map(normalize)
            .filter(|w| !w.is_empty())
            .collect();
        Self { stopwords, junk }
    }

    pub fn tokenize(&self, normalized: &str) -> Vec<String> {
        tokenize(normalized, &self.stopwords, &self.junk)
    }

    /// Run the whole engine over `text`.
    pub fn analyze(&self, text: &str) -> Result<Analysis, Rejection> {
        let text = validate(text)?;
        let tokens = self.tokenize(&normalize(text));
        let frequencies = count_frequencies(&tokens);
        let contexts = extract_contexts(text, frequencies.keys().map(String::as_str));
        debug!(
            tokens = tokens.len(),
            words = frequencies.len(),
            contexts = contexts.len(),
            "Analyzed text"
        );
        Ok(Analysis {
            frequencies,
            contexts,
            token_count: tokens.len(),
        })
    }
}
