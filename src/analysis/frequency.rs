//! Tokenization and frequency counting.

use super::normalize::{clean_token, is_numeric_like, strip_token};
use crate::models::WordFrequencies;
use std::collections::HashSet;

pub const MIN_WORD_CHARS: usize = 4;
pub const MAX_WORD_CHARS: usize = 100;

/// Share of all tokens a single word may reach before it is treated as an artifact.
pub const MAX_SHARE: f64 = 0.10;
/// Floor for the artifact cap so short articles keep their repeated words.
pub const MIN_CAP: f64 = 10.0;

/// Split normalized text into vocabulary tokens.
///
/// A token is dropped when, after cleanup, it is shorter than four
/// characters, numeric or mostly numeric, a junk pattern, free of letters,
/// a stopword, or longer than 100 characters.
pub fn tokenize(
    normalized: &str,
    stopwords: &HashSet<String>,
    junk: &HashSet<String>,
) -> Vec<String> {
    normalized
        .split_whitespace()
        .filter_map(|raw| accept_token(raw, stopwords, junk))
        .collect()
}

fn accept_token(raw: &str, stopwords: &HashSet<String>, junk: &HashSet<String>) -> Option<String> {
    let token = clean_token(raw);
    if token.chars().count() < MIN_WORD_CHARS {
        return None;
    }
    if is_numeric_like(token) {
        return None;
    }
    if junk.contains(token) {
        return None;
    }
    if !token.chars().any(char::is_alphabetic) {
        return None;
    }

    let word = strip_token(token);
    let len = word.chars().count();
    if !(MIN_WORD_CHARS..=MAX_WORD_CHARS).contains(&len) || stopwords.contains(&word) {
        return None;
    }
    Some(word)
}

/// Tally tokens, then drop words repeated more than `max(total * 0.10, 10)` times.
pub fn count_frequencies(tokens: &[String]) -> WordFrequencies {
    let mut counts = WordFrequencies::new();
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0) += 1;
    }

    let cap = frequency_cap(tokens.len());
    counts.retain(|_, count| (*count as f64) <= cap);
    counts
}

pub fn frequency_cap(total_tokens: usize) -> f64 {
    (total_tokens as f64 * MAX_SHARE).max(MIN_CAP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::normalize::normalize;

    fn sets(stop: &[&str], junk: &[&str]) -> (HashSet<String>, HashSet<String>) {
        (
            stop.iter().map(|s| s.to_string()).collect(),
            junk.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[test]
    fn test_tokenize_filters() {
        let (stop, junk) = sets(&["dans", "avec"], &["cookies"]);
        let text = normalize(
            "Dans la cuisine, l'économie 2024 rime avec cookies et 12345ab ! Le chef-cuisinier prépare.",
        );
        let tokens = tokenize(&text, &stop, &junk);

        assert_eq!(
            tokens,
            vec!["cuisine", "economie", "rime", "chef-cuisinier", "prepare"]
        );
    }

    #[test]
    fn test_accepted_words_are_at_least_four_chars() {
        let (stop, junk) = sets(&[], &[]);
        let text = normalize("a bb ccc dddd l'eau d'ici qu'il jusqu'au -ab- éeee");
        let tokens = tokenize(&text, &stop, &junk);

        assert!(tokens.iter().all(|w| w.chars().count() >= MIN_WORD_CHARS));
        assert_eq!(tokens, vec!["dddd", "eeee"]);
    }

    #[test]
    fn test_count_frequencies_tallies() {
        let tokens: Vec<String> = ["maison", "jardin", "maison"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let freq = count_frequencies(&tokens);

        assert_eq!(freq.get("maison"), Some(&2));
        assert_eq!(freq.get("jardin"), Some(&1));
    }

    #[test]
    fn test_count_frequencies_caps_runaway_words() {
        // 200 tokens: cap = max(20, 10) = 20
        let mut tokens = vec!["artefact".to_string(); 21];
        tokens.extend(vec!["frequent".to_string(); 20]);
        tokens.extend((0..159).map(|i| format!("mot{i:03}x")));
        let freq = count_frequencies(&tokens);

        assert!(!freq.contains_key("artefact"));
        assert_eq!(freq.get("frequent"), Some(&20));
        let cap = frequency_cap(tokens.len());
        assert!(freq.values().all(|&f| f >= 1 && (f as f64) <= cap));
    }

    #[test]
    fn test_cap_floor_for_short_articles() {
        let tokens = vec!["refrain".to_string(); 10];
        assert_eq!(count_frequencies(&tokens).get("refrain"), Some(&10));

        let tokens = vec!["refrain".to_string(); 11];
        assert!(count_frequencies(&tokens).is_empty());
    }
}
