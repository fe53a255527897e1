// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client-side rate governance.
//!
//! Strava reports quota usage on every response:
//!
//! ```text
//! X-RateLimit-Limit: 200,2000
//! X-RateLimit-Usage: 136,850
//! ```
//!
//! The first number of each pair is the rolling 15-minute window, the second
//! the daily window. [`parse_rate_limits`] turns those headers into a
//! [`RateUsage`] value, and [`RequestPacer`] decides how long to wait before
//! the next call.

use crate::config::Config;
use reqwest::header::HeaderMap;
use std::time::Duration;
use tokio::time::Instant;

const USAGE_HEADER: &str = "x-ratelimit-usage";
const LIMIT_HEADER: &str = "x-ratelimit-limit";

/// Fraction of the short window above which the pacer cools down.
pub const COOLDOWN_THRESHOLD: f64 = 0.9;

/// Usage within one quota window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaWindow {
    pub used: u32,
    pub limit: u32,
}

impl QuotaWindow {
    /// Used share of the limit (0 when the limit is unknown).
    pub fn fraction(&self) -> f64 {
        if self.limit == 0 {
            return 0.0;
        }
        f64::from(self.used) / f64::from(self.limit)
    }

    /// Whether usage is strictly above `threshold * limit`.
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.limit > 0 && f64::from(self.used) > f64::from(self.limit) * threshold
    }
}

/// Quota usage reported by one response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateUsage {
    /// Rolling 15-minute window
    pub short: QuotaWindow,
    /// Daily window
    pub daily: QuotaWindow,
}

/// Parse Strava's `"short,daily"` usage and limit headers.
///
/// Returns `None` when either header is missing or malformed.
pub fn parse_rate_limits(headers: &HeaderMap) -> Option<RateUsage> {
    let (short_used, daily_used) = parse_pair(headers, USAGE_HEADER)?;
    let (short_limit, daily_limit) = parse_pair(headers, LIMIT_HEADER)?;

    Some(RateUsage {
        short: QuotaWindow {
            used: short_used,
            limit: short_limit,
        },
        daily: QuotaWindow {
            used: daily_used,
            limit: daily_limit,
        },
    })
}

fn parse_pair(headers: &HeaderMap, name: &str) -> Option<(u32, u32)> {
    let value = headers.get(name)?.to_str().ok()?;
    let (short, daily) = value.split_once(',')?;
    Some((short.trim().parse().ok()?, daily.trim().parse().ok()?))
}

/// Scheduling policy evaluated before every network call.
///
/// Two independent deadlines gate the next call: the fixed delay after each
/// per-activity stream attempt, and the cooldown armed when the short quota
/// window is over [`COOLDOWN_THRESHOLD`]. The caller waits for whichever is
/// later. State lives only for one run.
#[derive(Debug)]
pub struct RequestPacer {
    request_delay: Duration,
    cooldown: Duration,
    next_allowed: Option<Instant>,
    cooldown_until: Option<Instant>,
    last_usage: Option<RateUsage>,
}

impl RequestPacer {
    pub fn new(request_delay: Duration, cooldown: Duration) -> Self {
        Self {
            request_delay,
            cooldown,
            next_allowed: None,
            cooldown_until: None,
            last_usage: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.request_delay, config.rate_limit_cooldown)
    }

    /// How long a call issued at `now` has to wait.
    pub fn delay_until_ready(&self, now: Instant) -> Duration {
        [self.next_allowed, self.cooldown_until]
            .into_iter()
            .flatten()
            .map(|deadline| deadline.saturating_duration_since(now))
            .max()
            .unwrap_or(Duration::ZERO)
    }

    /// Whether a cooldown is pending.
    pub fn cooling_down(&self) -> bool {
        self.cooldown_until.is_some()
    }

    /// Wait until the next call may proceed.
    pub async fn wait_turn(&mut self) {
        let wait = self.delay_until_ready(Instant::now());
        if !wait.is_zero() {
            if self.cooling_down() {
                tracing::info!(wait_ms = wait.as_millis() as u64, "Rate limit cooldown");
            }
            tokio::time::sleep(wait).await;
        }
        self.cooldown_until = None;
    }

    /// Start the fixed delay window after a per-activity attempt.
    pub fn record_attempt(&mut self) {
        self.next_allowed = Some(Instant::now() + self.request_delay);
    }

    /// Feed the usage reported by the latest response.
    ///
    /// Arms the cooldown when the short window is over the threshold and
    /// returns the usage so callers can thread it on.
    pub fn observe(&mut self, usage: Option<RateUsage>) -> Option<RateUsage> {
        let usage = usage?;

        if usage.short.exceeds(COOLDOWN_THRESHOLD) {
            tracing::warn!(
                used = usage.short.used,
                limit = usage.short.limit,
                fraction = usage.short.fraction(),
                cooldown_secs = self.cooldown.as_secs_f64(),
                "Short-window rate limit above 90%, cooling down"
            );
            self.cooldown_until = Some(Instant::now() + self.cooldown);
        }

        if usage.daily.exceeds(COOLDOWN_THRESHOLD) {
            tracing::warn!(
                used = usage.daily.used,
                limit = usage.daily.limit,
                fraction = usage.daily.fraction(),
                "Daily rate limit above 90%"
            );
        }

        self.last_usage = Some(usage);
        Some(usage)
    }

    /// Most recent usage seen this run.
    pub fn last_usage(&self) -> Option<RateUsage> {
        self.last_usage
    }
}
