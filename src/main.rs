//! # Vocab Harvest
//!
//! A news-to-vocabulary pipeline that scrapes articles from configured news
//! sources, analyzes their text, and appends per-article word frequencies
//! with example sentences to a daily CSV partition.
//!
//! ## Features
//!
//! - Pluggable per-source strategies (CSS selectors, CNN Lite, RSS/Atom feeds)
//!   selected by name in a YAML config
//! - Bounded concurrent fetching with staggered requests and a circuit breaker
//! - French-aware text validation, tokenization, and frequency capping
//! - Exactly-once article writes with crash-safe snapshot/rollback
//! - Offline mode replaying saved HTML fixtures
//!
//! ## Usage
//!
//! ```sh
//! vocab_harvest -c sources.yaml -o ./output
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Discovery**: Find article URLs on each source's homepage
//! 2. **Fetching**: Download article pages (3 at a time, breaker-guarded)
//! 3. **Analysis**: Extract, validate, and count words per article
//! 4. **Output**: Append rows to `vocabulary_<date>.csv`

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod analysis;
mod cli;
mod config;
mod error;
mod fetch;
mod fixtures;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;

use analysis::TextAnalyzer;
use cli::Cli;
use config::AppConfig;
use fetch::HttpFetcher;
use fixtures::DirectoryFixtures;
use outputs::VocabularySink;
use pipeline::{Mode, Orchestrator};
use scrapers::StrategyRegistry;
use utils::ensure_writable_dir;

/// Load the YAML config named on the command line and apply the CLI overrides.
fn load_config(args: &Cli) -> Result<AppConfig, Box<dyn Error>> {
    let mut config = match AppConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Cannot load configuration");
            return Err(e.into());
        }
    };
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(dir) = &args.fixtures_dir {
        config.fixtures_dir = dir.clone();
    }
    config.offline |= args.offline;
    Ok(config)
}

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("vocab_harvest starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.config, ?args.output_dir, offline = args.offline, "Parsed CLI arguments");

    let config = load_config(&args)?;

    // Early check: ensure the output dir is writable
    let output_dir = config.output_dir.to_string_lossy().into_owned();
    if let Err(e) = ensure_writable_dir(&output_dir).await {
        error!(
            path = %output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let date_scraped = Local::now().date_naive();
    let sink = Arc::new(VocabularySink::open(&config.output_dir, date_scraped)?);
    let fetcher = Arc::new(HttpFetcher::new(&config.fetch)?);
    let fixtures = Arc::new(DirectoryFixtures::new(&config.fixtures_dir));
    let analyzer = TextAnalyzer::new(&config.analysis);

    for name in &args.sources {
        if !config.sources.iter().any(|s| &s.name == name) {
            warn!(source = %name, "Requested source is not configured");
        }
    }
    let selected: Vec<_> = config
        .sources
        .iter()
        .filter(|s| args.sources.is_empty() || args.sources.contains(&s.name))
        .cloned()
        .collect();
    info!(
        configured = config.sources.len(),
        selected = selected.len(),
        offline = config.offline,
        "Sources selected"
    );

    let mode = if config.offline { Mode::Offline } else { Mode::Live };
    let orchestrator = Orchestrator::new(StrategyRegistry::builtin(), analyzer, Arc::clone(&sink), fetcher, fixtures)
        .mode(mode)
        .fetch_settings(&config.fetch)
        .source_concurrency(config.source_concurrency)
        .date_scraped(date_scraped);

    let metrics = orchestrator.run_all(&selected).await;

    for source in &metrics.sources {
        info!(
            source = %source.source,
            processed = source.processed,
            attempted = source.attempted,
            "Source summary"
        );
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        processed = metrics.total_processed(),
        attempted = metrics.total_attempted(),
        success_rate = %format!("{:.1}%", metrics.success_rate() * 100.0),
        partition = %sink.partition_path().display(),
        "Execution complete"
    );

    Ok(())
}
