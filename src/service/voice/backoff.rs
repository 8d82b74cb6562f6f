//! Exponential backoff for reconnection attempts.

use std::time::Duration;

use rand::Rng;

use crate::config::Config;

/// Retry budget and delay curve for the reconnection supervisor.
///
/// The delay before attempt `n + 1` after `n` failures is `unit * base^n`,
/// counted from the event that scheduled it. A small random jitter is added
/// when the attempt is actually scheduled so guilds that dropped together do
/// not all reconnect on the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub base: u32,
    pub unit: Duration,
    /// Failures after which the session is abandoned.
    pub ceiling: u32,
    pub max_jitter: Duration,
}

impl BackoffPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base: config.backoff_base,
            unit: Duration::from_millis(config.backoff_unit_ms),
            ceiling: config.max_reconnect_attempts,
            max_jitter: Duration::from_millis(config.backoff_jitter_ms),
        }
    }

    /// Delay owed after `failures` consecutive failures.
    pub fn delay_for(&self, failures: u32) -> Duration {
        let factor = self.base.checked_pow(failures).unwrap_or(u32::MAX);
        self.unit.saturating_mul(factor)
    }

    /// Random extra delay in `0..=max_jitter`.
    pub fn jitter(&self) -> Duration {
        let max_ms = self.max_jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::rng().random_range(0..=max_ms))
    }

    /// Whether `failures` has reached the retry ceiling.
    pub fn is_exhausted(&self, failures: u32) -> bool {
        failures >= self.ceiling
    }
}
