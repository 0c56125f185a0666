//! In-memory [`PageFetcher`] for exercising the pipeline without a network.

use crate::error::FetchError;
use crate::fetch::PageFetcher;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Serves a fixed URL → body table; unknown URLs answer HTTP 404.
/// Tracks call count, the peak number of concurrent requests, and which
/// URLs were answered successfully.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, String>,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    served: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new<I>(pages: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            pages: pages.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// URLs whose fetch returned a body, in completion order.
    pub fn served(&self) -> Vec<String> {
        self.served.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let body = self.pages.get(url).cloned().ok_or_else(|| FetchError::HttpStatus {
            url: url.to_string(),
            status: 404,
        })?;
        if let Ok(mut served) = self.served.lock() {
            served.push(url.to_string());
        }
        Ok(body)
    }
}
