//! Command-line interface definitions for the vocabulary harvester.
//!
//! Options given here override the corresponding values of the YAML config.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the vocabulary harvester.
///
/// # Examples
///
/// ```sh
/// # Live run over every enabled source
/// vocab_harvest -c sources.yaml -o ./output
///
/// # Replay saved pages for two sources, no network
/// vocab_harvest -c sources.yaml --offline -s lemonde -s cnn
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "VOCAB_CONFIG")]
    pub config: PathBuf,

    /// Output directory for the daily vocabulary partitions
    #[arg(short, long, env = "VOCAB_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Directory holding `<source>/*.html` fixtures for offline runs
    #[arg(long)]
    pub fixtures_dir: Option<PathBuf>,

    /// Replay fixtures instead of fetching live pages
    #[arg(long)]
    pub offline: bool,

    /// Only run the named source (repeatable)
    #[arg(short, long = "source")]
    pub sources: Vec<String>,
}
