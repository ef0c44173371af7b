//! Per-endpoint sliding-window request limiter.
//!
//! Tracks the timestamps of recent requests per endpoint. A request is
//! admitted only while the count inside the trailing window stays below the
//! ceiling; the request that would exceed it is rejected before dispatch.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default ceiling: 100 requests per endpoint per window.
pub const DEFAULT_MAX_REQUESTS: usize = 100;

/// Default trailing window: one minute.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Sliding-window limiter keyed by endpoint path.
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    requests: HashMap<String, Vec<Instant>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            requests: HashMap::new(),
        }
    }

    /// Try to admit a request to `endpoint`.
    ///
    /// Prunes timestamps older than the window, then either records the
    /// request and returns `true`, or returns `false` without recording.
    pub fn check(&mut self, endpoint: &str) -> bool {
        let now = Instant::now();
        let timestamps = self.requests.entry(endpoint.to_string()).or_default();
        timestamps.retain(|t| now.duration_since(*t) < self.window);

        if timestamps.len() >= self.max_requests {
            return false;
        }
        timestamps.push(now);
        true
    }

    /// The configured per-window ceiling.
    pub fn max_requests(&self) -> usize {
        self.max_requests
    }

    /// The configured trailing window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Drop all recorded request history.
    pub fn reset(&mut self) {
        self.requests.clear();
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }
}
