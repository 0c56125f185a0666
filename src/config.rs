//! YAML configuration for a harvesting run.
//!
//! ```yaml
//! output_dir: ./output
//! fixtures_dir: ./fixtures
//! offline: false
//! source_concurrency: 2
//! fetch:
//!   timeout_secs: 20
//!   base_delay_ms: 500
//! analysis:
//!   extra_stopwords: [gouvernement]
//!   junk_patterns: [lire, abonnez]
//! sources:
//!   - name: cnn
//!     link_strategy: cnn_lite
//!     article_strategy: cnn_lite
//!     link_params:
//!       homepage_url: https://lite.cnn.com
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};

/// Free-form strategy parameters.
pub type Params = BTreeMap<String, String>;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_fixtures_dir")]
    pub fixtures_dir: PathBuf,
    #[serde(default)]
    pub offline: bool,
    /// How many sources may run at the same time.
    #[serde(default = "default_source_concurrency")]
    pub source_concurrency: usize,
    #[serde(default)]
    pub fetch: FetchSettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    pub sources: Vec<SourceConfig>,
}

/// One configured news origin.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SourceConfig {
    pub name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub link_strategy: String,
    pub article_strategy: String,
    #[serde(default)]
    pub link_params: Params,
    #[serde(default)]
    pub article_params: Params,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FetchSettings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    #[serde(default)]
    pub user_agents: Vec<String>,
}

impl FetchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            base_delay_ms: default_base_delay_ms(),
            max_workers: default_max_workers(),
            user_agents: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AnalysisSettings {
    #[serde(default)]
    pub extra_stopwords: Vec<String>,
    #[serde(default)]
    pub junk_patterns: Vec<String>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./output")
}

fn default_fixtures_dir() -> PathBuf {
    PathBuf::from("./fixtures")
}

fn default_source_concurrency() -> usize {
    1
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_base_delay_ms() -> u64 {
    500
}

fn default_max_workers() -> usize {
    3
}

impl AppConfig {
    /// Read, parse, and validate a config file.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&raw).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        info!(sources = config.sources.len(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::Invalid("no sources configured".into()));
        }
        if self.fetch.max_workers == 0 {
            return Err(ConfigError::Invalid("fetch.max_workers must be at least 1".into()));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Invalid("fetch.timeout_secs must be at least 1".into()));
        }
        let mut seen = HashSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(ConfigError::Invalid("source with empty name".into()));
            }
            if !seen.insert(source.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate source name '{}'",
                    source.name
                )));
            }
        }
        Ok(())
    }
}
