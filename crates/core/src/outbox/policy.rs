//! Retry and dead-letter policy for outbox delivery.

use chrono::{DateTime, TimeDelta, Utc};
use loom_shared::config::OutboxConfig;

/// What to do with a message after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboxDecision {
    /// Try again at the given time.
    Retry {
        /// Earliest next attempt.
        at: DateTime<Utc>,
    },
    /// Stop retrying.
    DeadLetter,
}

/// Exponential backoff with an attempt ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts before dead-lettering.
    pub max_attempts: u32,
    /// Delay after the first failure.
    pub base_backoff: TimeDelta,
    /// Delay ceiling.
    pub max_backoff: TimeDelta,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&OutboxConfig::default())
    }
}

impl From<&OutboxConfig> for RetryPolicy {
    fn from(config: &OutboxConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_backoff: seconds(config.base_backoff_secs),
            max_backoff: seconds(config.max_backoff_secs),
        }
    }
}

fn seconds(secs: u64) -> TimeDelta {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX)
}

impl RetryPolicy {
    /// Delay before the next attempt after `attempts` failures:
    /// `base * 2^(attempts - 1)`, capped at `max_backoff`.
    #[must_use]
    pub fn backoff(&self, attempts: u32) -> TimeDelta {
        let exponent = attempts.saturating_sub(1).min(30);
        let factor = 1i32 << exponent;
        self.base_backoff
            .checked_mul(factor)
            .map_or(self.max_backoff, |delay| delay.min(self.max_backoff))
    }

    /// Decides the fate of a message that has now failed `attempts` times.
    ///
    /// Non-retryable failures are dead-lettered immediately.
    #[must_use]
    pub fn decide(&self, attempts: u32, retryable: bool, now: DateTime<Utc>) -> OutboxDecision {
        if !retryable || attempts >= self.max_attempts {
            return OutboxDecision::DeadLetter;
        }
        now.checked_add_signed(self.backoff(attempts))
            .map_or(OutboxDecision::DeadLetter, |at| OutboxDecision::Retry { at })
    }
}
