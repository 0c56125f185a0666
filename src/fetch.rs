//! Page acquisition over HTTP.
//!
//! The module uses a trait-based design so the orchestrator can be driven
//! by something other than the network:
//! - [`PageFetcher`]: core trait defining async page retrieval
//! - [`HttpFetcher`]: reqwest-backed implementation with a fixed timeout
//!
//! No retries happen here. A failed fetch is reported to the caller, which
//! counts it towards the circuit breaker and moves on.

use crate::config::FetchSettings;
use crate::error::FetchError;
use rand::{Rng, rng};
use reqwest::Client;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Trait for async page retrieval.
///
/// The returned future must be `Send` so fetches can run on spawned tasks.
pub trait PageFetcher: Send + Sync {
    /// Fetch the body of `url` as text.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Fetches pages with reqwest. Every request carries the configured timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    user_agents: Vec<String>,
}

impl HttpFetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self, reqwest::Error> {
        Self::with_timeout(settings.timeout(), settings.user_agents.clone())
    }

    pub fn with_timeout(timeout: Duration, user_agents: Vec<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        let user_agents = if user_agents.is_empty() {
            vec![DEFAULT_USER_AGENT.to_string()]
        } else {
            user_agents
        };
        Ok(Self {
            client,
            user_agents,
        })
    }

    /// One configured user agent, picked at random per request.
    fn user_agent(&self) -> &str {
        let idx = rng().random_range(0..self.user_agents.len());
        &self.user_agents[idx]
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let parsed = url::Url::parse(url)?;
        let t0 = Instant::now();

        let response = self
            .client
            .get(parsed)
            .header(reqwest::header::USER_AGENT, self.user_agent())
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "Non-success status");
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}
