//! Bounded, breaker-guarded concurrent fetching of a source's article URLs.
//!
//! At most `min(url_count, max_workers)` requests are in flight. Worker `i`
//! waits `base_delay * (i % 3)` before its first request to spread the load
//! on a single site; later requests go out as soon as a slot frees up.
//! Results are collected as they complete. Once the circuit breaker opens,
//! every outstanding task is aborted, and pages from tasks that had already
//! finished are still kept.

use super::breaker::CircuitBreaker;
use crate::error::FetchError;
use crate::fetch::PageFetcher;
use crate::models::Page;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Number of distinct stagger slots.
const STAGGER_SLOTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchPhaseSettings {
    pub max_workers: usize,
    pub base_delay: Duration,
}

impl Default for FetchPhaseSettings {
    fn default() -> Self {
        Self {
            max_workers: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

/// What a fetch phase produced.
#[derive(Debug, Default)]
pub struct FetchPhaseReport {
    pub pages: Vec<Page>,
    pub failures: usize,
    /// URLs whose request was started.
    pub started: usize,
    pub tripped: bool,
}

type FetchResult = (String, Result<String, FetchError>);

/// Only the initial `pool` spawns are staggered.
fn stagger_delay(base_delay: Duration, index: usize, pool: usize) -> Duration {
    if index < pool {
        base_delay * (index % STAGGER_SLOTS) as u32
    } else {
        Duration::ZERO
    }
}

fn spawn_next<F, I>(
    tasks: &mut JoinSet<FetchResult>,
    queue: &mut I,
    fetcher: &Arc<F>,
    base_delay: Duration,
    pool: usize,
) -> bool
where
    F: PageFetcher + 'static,
    I: Iterator<Item = (usize, String)>,
{
    let Some((index, url)) = queue.next() else {
        return false;
    };
    let fetcher = Arc::clone(fetcher);
    let delay = stagger_delay(base_delay, index, pool);
    tasks.spawn(async move {
        if !delay.is_zero() {
            sleep(delay).await;
        }
        let result = fetcher.fetch(&url).await;
        (url, result)
    });
    true
}

/// Collect what aborted tasks had already finished before the abort landed.
async fn drain_aborted(tasks: &mut JoinSet<FetchResult>, report: &mut FetchPhaseReport) {
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((url, Ok(body))) => {
                debug!(%url, bytes = body.len(), "Keeping page fetched before the breaker opened");
                report.pages.push(Page::new(url, body));
            }
            Ok((url, Err(e))) => {
                debug!(%url, error = %e, "Article fetch failed");
                report.failures += 1;
            }
            Err(_) => {}
        }
    }
}

/// Fetch every URL with bounded parallelism and early termination.
#[instrument(level = "info", skip_all, fields(urls = urls.len()))]
pub async fn fetch_all<F>(fetcher: Arc<F>, urls: Vec<String>, settings: FetchPhaseSettings) -> FetchPhaseReport
where
    F: PageFetcher + 'static,
{
    let mut report = FetchPhaseReport::default();
    let pool = urls.len().min(settings.max_workers.max(1));
    if pool == 0 {
        return report;
    }

    let breaker = CircuitBreaker::default();
    let mut queue = urls.into_iter().enumerate();
    let mut tasks = JoinSet::new();
    for _ in 0..pool {
        if spawn_next(&mut tasks, &mut queue, &fetcher, settings.base_delay, pool) {
            report.started += 1;
        }
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((url, Ok(body))) => {
                debug!(%url, bytes = body.len(), "Fetched article page");
                breaker.record_success();
                report.pages.push(Page::new(url, body));
            }
            Ok((url, Err(e))) => {
                warn!(%url, error = %e, "Article fetch failed");
                breaker.record_failure();
                report.failures += 1;
            }
            Err(e) if e.is_cancelled() => continue,
            Err(e) => {
                warn!(error = %e, "Fetch task panicked");
                breaker.record_failure();
                report.failures += 1;
            }
        }

        if breaker.is_open() {
            warn!(
                failures = breaker.failures(),
                completed = breaker.completed(),
                "Circuit breaker open; cancelling remaining fetches"
            );
            tasks.abort_all();
            report.tripped = true;
            drain_aborted(&mut tasks, &mut report).await;
            break;
        }

        if spawn_next(&mut tasks, &mut queue, &fetcher, settings.base_delay, pool) {
            report.started += 1;
        }
    }

    info!(
        fetched = report.pages.len(),
        failures = report.failures,
        started = report.started,
        tripped = report.tripped,
        "Fetch phase complete"
    );
    report
}
