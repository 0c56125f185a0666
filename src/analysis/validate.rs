//! Up-front rejection of text that is not worth analysing.

use crate::error::Rejection;
use std::collections::HashSet;

pub const MIN_CHARS: usize = 10;
pub const MAX_CHARS: usize = 1_000_000;
pub const MIN_WORDS: usize = 5;
pub const MIN_UNIQUE_RATIO: f64 = 0.30;
pub const MIN_ALPHA_RATIO: f64 = 0.50;

/// Accept `text` unchanged or say why it was refused.
///
/// Checks run cheapest first: emptiness, length bounds, word count, the
/// unique-word ratio (repetition/spam), then the alphabetic ratio.
pub fn validate(text: &str) -> Result<&str, Rejection> {
    if text.trim().is_empty() {
        return Err(Rejection::Empty);
    }

    let chars = text.chars().count();
    if chars < MIN_CHARS {
        return Err(Rejection::TooShort(chars));
    }
    if chars > MAX_CHARS {
        return Err(Rejection::TooLong(chars));
    }

    let words: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
    if words.len() < MIN_WORDS {
        return Err(Rejection::TooFewWords(words.len()));
    }

    let unique = words.iter().collect::<HashSet<_>>().len();
    let unique_ratio = unique as f64 / words.len() as f64;
    if unique_ratio < MIN_UNIQUE_RATIO {
        return Err(Rejection::Repetitive(unique_ratio));
    }

    let alpha = text.chars().filter(|c| c.is_alphabetic()).count();
    let alpha_ratio = alpha as f64 / chars as f64;
    if alpha_ratio < MIN_ALPHA_RATIO {
        return Err(Rejection::NotEnoughLetters(alpha_ratio));
    }

    Ok(text)
}
