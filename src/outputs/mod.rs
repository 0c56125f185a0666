//! Output sink: the daily vocabulary partition.
//!
//! # Submodules
//!
//! - [`rows`]: the CSV row layout, field caps, and dedup keys
//! - [`snapshot`]: backup → mutate → commit/rollback around one append
//! - [`sink`]: [`VocabularySink`], the single writer shared by every source
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── vocabulary_2025-05-06.csv
//! └── vocabulary_2025-05-07.csv
//! ```
//!
//! Each file has one header row followed by one row per word per article:
//! `word,context,source,article_date,scraped_date,title,frequency`.

pub mod rows;
pub mod sink;
pub mod snapshot;

pub use sink::{VocabularySink, WriteOutcome};
