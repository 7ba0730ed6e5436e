//! # Rate Limiter
//!
//! Sliding-window admission for metered commands.
//!
//! Each user owns the list of timestamps of their admitted calls. On every call the
//! entries older than the window are pruned; the call is admitted only while fewer than
//! `limit` remain. A rejected call is not recorded, so hammering the command does not
//! push the window further out.
//!
//! The limiter itself is not synchronized. The bot keeps each instance behind a
//! `tokio::sync::Mutex` so prune, check and record happen as one step per user.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use crate::domain::config::RateLimitConfig;

#[derive(Debug)]
pub struct RateLimiter {
    limit: usize,
    window: Duration,
    calls: HashMap<String, VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(limit: usize, window: Duration) -> Self {
        Self {
            limit,
            window,
            calls: HashMap::new(),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.limit, config.window())
    }

    /// Admits or rejects a call by `user` at `now`.
    pub fn admit(&mut self, user: &str, now: Instant) -> bool {
        let window = self.window;
        let calls = self.calls.entry(user.to_string()).or_default();
        prune(calls, now, window);

        if calls.len() >= self.limit {
            tracing::debug!("Rate limit hit for {} ({} calls in {:?})", user, calls.len(), window);
            return false;
        }
        calls.push_back(now);
        true
    }

    /// How long until `user` would be admitted again, `None` if they would be now.
    pub fn retry_after(&mut self, user: &str, now: Instant) -> Option<Duration> {
        let calls = self.calls.get_mut(user)?;
        prune(calls, now, self.window);
        if calls.len() < self.limit {
            return None;
        }
        // The oldest call leaves the window first
        let oldest = *calls.front()?;
        Some((oldest + self.window).saturating_duration_since(now))
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}

fn prune(calls: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(&oldest) = calls.front() {
        if now.saturating_duration_since(oldest) >= window {
            calls.pop_front();
        } else {
            break;
        }
    }
}
