//! Data models shared by the strategies, the analysis engine, and the sink.
//!
//! - [`Page`]: a raw document plus the identifier it was acquired under
//! - [`ArticleRecord`]: structured article produced by an extraction strategy
//! - [`WordFrequencies`] / [`WordContexts`]: per-article analysis results
//! - [`SourceMetrics`] / [`RunMetrics`]: processed/attempted counts for a run

use chrono::NaiveDate;
use std::collections::HashMap;

/// Word → occurrence count for a single analysed article.
pub type WordFrequencies = HashMap<String, usize>;

/// Word → first sentence of the article containing it.
pub type WordContexts = HashMap<String, String>;

/// A raw document as acquired from the network or from a fixture.
///
/// The body is kept as text so that pages can cross task boundaries;
/// strategies parse it themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// URL or fixture identifier the page was acquired under.
    pub identifier: String,
    /// The raw HTML (or feed XML) body.
    pub body: String,
}

impl Page {
    pub fn new(identifier: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            body: body.into(),
        }
    }
}

pub const MIN_TITLE_CHARS: usize = 5;
pub const MAX_TITLE_CHARS: usize = 500;
pub const MIN_TEXT_CHARS: usize = 50;

/// A structured article, immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRecord {
    pub title: String,
    pub full_text: String,
    pub article_date: NaiveDate,
    pub date_scraped: NaiveDate,
    pub paragraph_count: usize,
}

impl ArticleRecord {
    /// Build a record from extracted pieces.
    ///
    /// Returns `None` when the title is outside 5–500 characters or the
    /// joined paragraphs are shorter than 50 characters. A missing or
    /// unparseable `article_date` falls back to `date_scraped`.
    pub fn build(
        title: &str,
        paragraphs: &[String],
        article_date: Option<NaiveDate>,
        date_scraped: NaiveDate,
    ) -> Option<Self> {
        let title = collapse_whitespace(title);
        let title_len = title.chars().count();
        if !(MIN_TITLE_CHARS..=MAX_TITLE_CHARS).contains(&title_len) {
            return None;
        }

        let paragraphs: Vec<String> = paragraphs
            .iter()
            .map(|p| collapse_whitespace(p))
            .filter(|p| !p.is_empty())
            .collect();
        let full_text = paragraphs.join("\n");
        if full_text.chars().count() < MIN_TEXT_CHARS {
            return None;
        }

        Some(Self {
            title,
            full_text,
            article_date: article_date.unwrap_or(date_scraped),
            date_scraped,
            paragraph_count: paragraphs.len(),
        })
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Outcome of one source's run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMetrics {
    pub source: String,
    pub processed: usize,
    pub attempted: usize,
}

/// Per-source and total counts for one orchestration run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunMetrics {
    pub sources: Vec<SourceMetrics>,
}

impl RunMetrics {
    pub fn record(&mut self, source: &str, processed: usize, attempted: usize) {
        self.sources.push(SourceMetrics {
            source: source.to_string(),
            processed,
            attempted,
        });
    }

    pub fn total_processed(&self) -> usize {
        self.sources.iter().map(|s| s.processed).sum()
    }

    pub fn total_attempted(&self) -> usize {
        self.sources.iter().map(|s| s.attempted).sum()
    }

    /// Fraction of attempted articles that made it to the sink, 0.0 when nothing was attempted.
    pub fn success_rate(&self) -> f64 {
        let attempted = self.total_attempted();
        if attempted == 0 {
            0.0
        } else {
            self.total_processed() as f64 / attempted as f64
        }
    }
}
