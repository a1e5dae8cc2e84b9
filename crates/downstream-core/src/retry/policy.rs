use std::collections::BTreeSet;
use std::time::Duration;
use thiserror::Error;

/// Status codes retried when no explicit set is configured.
pub const DEFAULT_RETRYABLE_STATUS_CODES: [u16; 4] = [500, 502, 503, 504];

/// Error returned when a policy is built from invalid parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,
}

/// Fixed-delay retry policy for a single forwarded request.
///
/// Built once (from config or defaults) and only read while a call runs;
/// every request gets its own attempt counter in the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first). Always >= 1.
    max_attempts: u32,
    /// Delay between two consecutive attempts.
    pub delay: Duration,
    /// Upper bound on a single attempt; an attempt exceeding it counts as a timeout.
    pub attempt_timeout: Duration,
    /// HTTP status codes treated as transient server errors.
    pub retryable_status_codes: BTreeSet<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(500),
            attempt_timeout: Duration::from_secs(5),
            retryable_status_codes: DEFAULT_RETRYABLE_STATUS_CODES.into_iter().collect(),
        }
    }
}

impl RetryPolicy {
    pub fn new(
        max_attempts: u32,
        delay: Duration,
        attempt_timeout: Duration,
        retryable_status_codes: impl IntoIterator<Item = u16>,
    ) -> Result<Self, PolicyError> {
        if max_attempts == 0 {
            return Err(PolicyError::ZeroAttempts);
        }
        Ok(Self {
            max_attempts,
            delay,
            attempt_timeout,
            retryable_status_codes: retryable_status_codes.into_iter().collect(),
        })
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// True if an HTTP failure with this status should be attempted again.
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_status_codes.contains(&status)
    }

    /// True if another attempt may follow attempt number `attempt` (1-based).
    pub fn has_budget_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}
