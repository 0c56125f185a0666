//! Sentence-context extraction: one example sentence per word.

use super::normalize::{clean_token, is_numeric_like, normalize, strip_token};
use crate::models::WordContexts;
use crate::utils::truncate_chars;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

pub const MIN_SENTENCE_CHARS: usize = 10;
pub const MAX_CONTEXT_CHARS: usize = 200;

static MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]*>|\*\*|__|[#*`\[\]]").expect("valid markup regex"));

/// Split on `.`, `!` or `?` followed by whitespace. The terminator stays
/// with its sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            if let Some(&(next_idx, next)) = chars.peek() {
                if next.is_whitespace() {
                    sentences.push(&text[start..next_idx]);
                    start = next_idx;
                }
            }
        }
    }
    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

/// Remove markup markers and surrounding punctuation from a raw sentence.
pub fn clean_sentence(sentence: &str) -> String {
    let without_markup = MARKUP.replace_all(sentence, "");
    let collapsed = without_markup.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| {
            c.is_whitespace()
                || c.is_ascii_punctuation()
                || matches!(c, '«' | '»' | '“' | '”' | '…' | '—' | '–')
        })
        .to_string()
}

/// The first sentence of `original_text` containing each word as a whole token.
///
/// Numeric or mostly numeric words never get a context. Contexts are
/// capped at 200 characters.
pub fn extract_contexts<'a, I>(original_text: &str, words: I) -> WordContexts
where
    I: IntoIterator<Item = &'a str>,
{
    let mut pending: HashSet<&str> = words
        .into_iter()
        .filter(|w| !is_numeric_like(w))
        .collect();
    let mut contexts = WordContexts::new();

    for raw in split_sentences(original_text) {
        if pending.is_empty() {
            break;
        }
        let sentence = clean_sentence(raw);
        if sentence.chars().count() < MIN_SENTENCE_CHARS {
            continue;
        }

        let normalized = normalize(&sentence);
        let tokens: HashSet<String> = normalized
            .split_whitespace()
            .map(|t| strip_token(clean_token(t)))
            .collect();

        let found: Vec<&str> = pending
            .iter()
            .copied()
            .filter(|w| tokens.contains(*w))
            .collect();
        for word in found {
            pending.remove(word);
            contexts.insert(
                word.to_string(),
                truncate_chars(&sentence, MAX_CONTEXT_CHARS).to_string(),
            );
        }
    }

    contexts
}
