//! CSV row layout for the vocabulary partition.

use crate::error::SinkError;
use crate::models::{ArticleRecord, WordContexts, WordFrequencies};
use crate::utils::truncate_chars;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::warn;

pub const MAX_WORD_CHARS: usize = 100;
pub const MAX_CONTEXT_CHARS: usize = 500;
pub const MAX_SOURCE_CHARS: usize = 500;
pub const MAX_TITLE_CHARS: usize = 200;
pub const MIN_WORD_CHARS: usize = 2;

/// One word of one article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyRow {
    pub word: String,
    pub context: String,
    pub source: String,
    pub article_date: String,
    pub scraped_date: String,
    pub title: String,
    pub frequency: usize,
}

/// Identity of an article in the output, built from the stored (capped) values.
pub fn dedup_key(title: &str, source: &str) -> String {
    format!(
        "{}:{}",
        truncate_chars(title, MAX_TITLE_CHARS),
        truncate_chars(source, MAX_SOURCE_CHARS)
    )
}

/// Rows for every word with at least two characters and a positive count,
/// most frequent first, ties broken alphabetically.
pub fn rows_for_article(
    article: &ArticleRecord,
    source: &str,
    frequencies: &WordFrequencies,
    contexts: &WordContexts,
) -> Vec<VocabularyRow> {
    let mut words: Vec<(&String, usize)> = frequencies
        .iter()
        .filter(|(word, count)| word.chars().count() >= MIN_WORD_CHARS && **count > 0)
        .map(|(word, count)| (word, *count))
        .collect();
    words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let source = truncate_chars(source, MAX_SOURCE_CHARS);
    let title = truncate_chars(&article.title, MAX_TITLE_CHARS);
    let article_date = article.article_date.to_string();
    let scraped_date = article.date_scraped.to_string();

    words
        .into_iter()
        .map(|(word, frequency)| VocabularyRow {
            word: truncate_chars(word, MAX_WORD_CHARS).to_string(),
            context: contexts
                .get(word)
                .map(|c| truncate_chars(c, MAX_CONTEXT_CHARS).to_string())
                .unwrap_or_default(),
            source: source.to_string(),
            article_date: article_date.clone(),
            scraped_date: scraped_date.clone(),
            title: title.to_string(),
            frequency,
        })
        .collect()
}

/// Append `rows` to `path`, creating it if needed. The header is written
/// only when `write_header` is set.
pub fn append_rows(path: &Path, rows: &[VocabularyRow], write_header: bool) -> Result<(), SinkError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| SinkError::io(path, e))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(write_header)
        .from_writer(file);
    for row in rows {
        writer.serialize(row).map_err(|e| SinkError::csv(path, e))?;
    }
    writer.flush().map_err(|e| SinkError::io(path, e))?;
    let file = writer
        .into_inner()
        .map_err(|e| SinkError::io(path, e.into_error()))?;
    file.sync_all().map_err(|e| SinkError::io(path, e))
}

/// Dedup keys of every article already present in `path`.
///
/// A missing file yields an empty set; unreadable rows are skipped.
pub fn read_keys(path: &Path) -> Result<HashSet<String>, SinkError> {
    let mut keys = HashSet::new();
    if !path.exists() {
        return Ok(keys);
    }

    let mut reader = csv::Reader::from_path(path).map_err(|e| SinkError::csv(path, e))?;
    for (line, result) in reader.deserialize::<VocabularyRow>().enumerate() {
        match result {
            Ok(row) => {
                keys.insert(dedup_key(&row.title, &row.source));
            }
            Err(e) => warn!(path = %path.display(), line = line + 2, error = %e, "Skipping unreadable row"),
        }
    }
    Ok(keys)
}
