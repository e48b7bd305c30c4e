//! Backoff settings for transient HTTP failures.

use std::time::Duration;

/// Status codes that are worth retrying.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Exponential backoff for transient statuses.
///
/// `attempts` counts every request, including the first one.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub attempts: usize,
    pub initial_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 5,
            initial_delay: Duration::from_millis(1500),
            multiplier: 1.75,
        }
    }
}

impl RetryPolicy {
    /// Defaults, overridable with `TCDB_RETRY_MAX` and `TCDB_RETRY_BASE_MS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            attempts: env_usize("TCDB_RETRY_MAX", defaults.attempts).max(1),
            initial_delay: Duration::from_millis(env_u64(
                "TCDB_RETRY_BASE_MS",
                defaults.initial_delay.as_millis() as u64,
            )),
            multiplier: defaults.multiplier,
        }
    }

    /// Wait before retry number `retry` (1-based).
    pub fn delay_for_retry(&self, retry: usize) -> Duration {
        let exp = retry.saturating_sub(1).min(30) as i32;
        self.initial_delay.mul_f64(self.multiplier.powi(exp))
    }
}

pub fn is_retryable(status: u16) -> bool {
    RETRYABLE_STATUSES.contains(&status)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(default)
}
