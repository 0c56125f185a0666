//! The vocabulary sink: exactly-once appends to the daily partition.
//!
//! One `VocabularySink` is opened per process and shared by reference
//! (`Arc`) with every source. Its mutex serializes the whole
//! check → snapshot → append → commit sequence, because the line-oriented,
//! header-once CSV format cannot take interleaved appends.

use super::rows::{self, VocabularyRow};
use super::snapshot::with_snapshot;
use crate::error::SinkError;
use crate::models::{ArticleRecord, WordContexts, WordFrequencies};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, error, info, instrument};

/// What a call to [`VocabularySink::write_article`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written { rows: usize },
    /// The article's key was already written in this process lifetime.
    Duplicate,
    /// Nothing worth writing survived the sink's own checks.
    Rejected,
    /// The append failed and the partition was restored.
    Failed,
}

impl WriteOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

#[derive(Debug)]
pub struct VocabularySink {
    dir: PathBuf,
    date: NaiveDate,
    /// Dedup keys written so far; the lock also guards the partition file.
    written: Mutex<HashSet<String>>,
}

impl VocabularySink {
    /// Open the partition for `date` under `dir`, seeding the dedup set
    /// from whatever the partition already holds.
    #[instrument(level = "info", skip_all, fields(dir = %dir.as_ref().display(), %date))]
    pub fn open(dir: impl AsRef<Path>, date: NaiveDate) -> Result<Self, SinkError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| SinkError::io(&dir, e))?;

        let path = partition_path(&dir, date);
        let keys = rows::read_keys(&path)?;
        info!(path = %path.display(), existing_articles = keys.len(), "Opened vocabulary partition");

        Ok(Self {
            dir,
            date,
            written: Mutex::new(keys),
        })
    }

    pub fn partition_path(&self) -> PathBuf {
        partition_path(&self.dir, self.date)
    }

    /// Whether the (title, source) pair is already in the output.
    #[cfg(test)]
    pub fn contains(&self, title: &str, source: &str) -> bool {
        self.written
            .lock()
            .map(|keys| keys.contains(&rows::dedup_key(title, source)))
            .unwrap_or(false)
    }

    /// Append one article's vocabulary, at most once per (title, source).
    ///
    /// Never returns an error: failures are logged, the partition is rolled
    /// back, and the key stays unmarked so a later retry can write it.
    pub fn write_article(
        &self,
        article: &ArticleRecord,
        source: &str,
        frequencies: &WordFrequencies,
        contexts: &WordContexts,
    ) -> WriteOutcome {
        let rows = rows::rows_for_article(article, source, frequencies, contexts);
        if rows.is_empty() {
            info!(%source, title = %article.title, "No valid word frequencies; nothing written");
            return WriteOutcome::Rejected;
        }

        let key = rows::dedup_key(&article.title, source);
        let mut written = match self.written.lock() {
            Ok(guard) => guard,
            Err(_) => {
                error!(error = %SinkError::Poisoned, "Cannot write article");
                return WriteOutcome::Failed;
            }
        };
        if written.contains(&key) {
            debug!(%source, title = %article.title, "Article already written; skipping");
            return WriteOutcome::Duplicate;
        }

        let path = self.partition_path();
        match append_partition(&path, &rows) {
            Ok(()) => {
                written.insert(key);
                info!(%source, rows = rows.len(), path = %path.display(), "Wrote article vocabulary");
                WriteOutcome::Written { rows: rows.len() }
            }
            Err(e) => {
                error!(%source, title = %article.title, error = %e, "Failed to write article vocabulary");
                WriteOutcome::Failed
            }
        }
    }
}

fn partition_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("vocabulary_{date}.csv"))
}

fn append_partition(path: &Path, rows: &[VocabularyRow]) -> Result<(), SinkError> {
    let write_header = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    with_snapshot(path, |p| rows::append_rows(p, rows, write_header))
}
