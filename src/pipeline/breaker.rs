//! Failure-ratio circuit breaker for a concurrent fetch phase.

use std::sync::atomic::{AtomicUsize, Ordering};

pub const MIN_FAILURES: usize = 5;
pub const MAX_FAILURE_RATIO: f64 = 0.8;

/// Counts completed fetches and failures; opens once at least
/// [`MIN_FAILURES`] failures make up more than [`MAX_FAILURE_RATIO`] of the
/// completions seen so far.
#[derive(Debug)]
pub struct CircuitBreaker {
    failures: AtomicUsize,
    completed: AtomicUsize,
    min_failures: usize,
    max_failure_ratio: f64,
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(MIN_FAILURES, MAX_FAILURE_RATIO)
    }
}

impl CircuitBreaker {
    pub fn new(min_failures: usize, max_failure_ratio: f64) -> Self {
        Self {
            failures: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            min_failures,
            max_failure_ratio,
        }
    }

    pub fn record_success(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn is_open(&self) -> bool {
        let failures = self.failures();
        let completed = self.completed();
        completed > 0
            && failures >= self.min_failures
            && failures as f64 / completed as f64 > self.max_failure_ratio
    }
}
