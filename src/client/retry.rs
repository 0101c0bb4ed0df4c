use std::time::Duration;

use crate::consts::{BASE_DELAY, MAX_ATTEMPTS};

/// How many times a request is tried and how long to wait between tries.
///
/// Every failure is retried the same way: there is no distinction between
/// client errors, server errors, and network failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_delay: BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Same attempt budget, no waiting. For tests.
    pub fn immediate() -> Self {
        Self {
            base_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Wait after `attempt` (1-based) failed. Grows linearly.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// Whether another attempt follows a failed `attempt`.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Attempts left after `attempt` failed.
    pub fn remaining_after(&self, attempt: u32) -> u32 {
        self.max_attempts.saturating_sub(attempt)
    }
}
