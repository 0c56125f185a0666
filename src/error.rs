//! Error types for every failure class of the harvesting pipeline.
//!
//! Each stage has its own enum so that the orchestrator can decide, by
//! type alone, how far a failure is allowed to propagate:
//!
//! | Error | Scope of the damage |
//! |-------|---------------------|
//! | [`ConfigError`] | Whole process (raised before any source runs) |
//! | [`StrategyError`] | One source |
//! | [`FetchError`] | One page |
//! | [`Rejection`] | One article |
//! | [`SinkError`] | One article's write, rolled back |

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load or validate the YAML configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// A source's strategies could not be resolved or instantiated.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("unknown {kind} strategy '{name}'")]
    Unknown { kind: &'static str, name: String },

    #[error("strategy '{strategy}' requires parameter '{param}'")]
    MissingParam { strategy: String, param: String },

    #[error("strategy '{strategy}' has an invalid selector '{selector}'")]
    InvalidSelector { strategy: String, selector: String },

    #[error("strategy '{strategy}' has an invalid parameter '{param}': {reason}")]
    InvalidParam {
        strategy: String,
        param: String,
        reason: String,
    },
}

/// A single page could not be acquired.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("timeout fetching {url}")]
    Timeout { url: String },

    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("fixture error for {path}: {source}")]
    Fixture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// Classify a reqwest error for the given URL.
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else {
            Self::Network {
                url: url.to_string(),
                source: err,
            }
        }
    }
}

/// Reasons the text analysis engine refuses an article's text outright.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("text is empty")]
    Empty,

    #[error("text too short ({0} chars, minimum 10)")]
    TooShort(usize),

    #[error("text too long ({0} chars, maximum 1000000)")]
    TooLong(usize),

    #[error("too few words ({0}, minimum 5)")]
    TooFewWords(usize),

    #[error("unique-word ratio {0:.2} below 0.30")]
    Repetitive(f64),

    #[error("alphabetic ratio {0:.2} below 0.50")]
    NotEnoughLetters(f64),
}

/// Output sink failures. Never surfaced past the sink itself.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("sink lock poisoned")]
    Poisoned,
}

impl SinkError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}
