//! Fixed-window rate limiter guarding the submission endpoint.
//!
//! One mutex serializes counter updates and the prune sweep, so an
//! increment-then-compare for a key can never interleave with an eviction of
//! that same key. Windows live only in process memory; a restart clears them.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;

/// Window length and request budget for one check.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitOptions {
    pub window_ms: i64,
    pub max_requests: u32,
}

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at_ms: i64,
}

struct WindowEntry {
    count: u32,
    reset_at_ms: i64,
}

/// Keyed fixed-window counter store.
pub struct FixedWindowLimiter {
    entries: Mutex<HashMap<String, WindowEntry>>,
    prune_threshold: usize,
}

const DEFAULT_PRUNE_THRESHOLD: usize = 500;

impl Default for FixedWindowLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_PRUNE_THRESHOLD)
    }
}

impl FixedWindowLimiter {
    pub fn new(prune_threshold: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            prune_threshold,
        }
    }

    /// Count one observation of `key` against the current wall-clock window.
    pub fn check(&self, key: &str, options: RateLimitOptions) -> RateDecision {
        self.check_at(key, Utc::now().timestamp_millis(), options)
    }

    /// Clock-explicit variant backing `check`; tests drive the window boundary
    /// directly instead of sleeping through it.
    pub(crate) fn check_at(
        &self,
        key: &str,
        now_ms: i64,
        options: RateLimitOptions,
    ) -> RateDecision {
        let mut entries = self.entries.lock().expect("rate limiter mutex poisoned");

        // Amortized inline sweep: only runs once the store is large, and the
        // same lock covers it, so the key being checked cannot race its own
        // eviction.
        if entries.len() >= self.prune_threshold {
            entries.retain(|_, entry| entry.reset_at_ms > now_ms);
        }

        let entry = entries.entry(key.to_string()).or_insert(WindowEntry {
            count: 0,
            reset_at_ms: now_ms + options.window_ms,
        });
        if entry.reset_at_ms <= now_ms {
            entry.count = 0;
            entry.reset_at_ms = now_ms + options.window_ms;
        }
        entry.count += 1;

        RateDecision {
            allowed: entry.count <= options.max_requests,
            remaining: options.max_requests.saturating_sub(entry.count),
            reset_at_ms: entry.reset_at_ms,
        }
    }
}
