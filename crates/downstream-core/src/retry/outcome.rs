//! Terminal records produced by the retry loop.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Final classified result of a forwarded call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Upstream answered 2xx; carries the parsed body.
    Ok(Value),
    /// No response could be obtained (connection refused, reset, DNS, ...).
    UpstreamUnreachable(String),
    /// The attempt did not complete within the per-attempt timeout.
    Timeout,
    /// Upstream answered, but not with a usable success.
    UpstreamError(String),
}

/// Wire label of an [`Outcome`], as reported in the `status` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Ok,
    UpstreamUnreachable,
    Timeout,
    UpstreamError,
}

impl OutcomeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeStatus::Ok => "ok",
            OutcomeStatus::UpstreamUnreachable => "upstream_unreachable",
            OutcomeStatus::Timeout => "timeout",
            OutcomeStatus::UpstreamError => "upstream_error",
        }
    }
}

impl Outcome {
    pub fn status(&self) -> OutcomeStatus {
        match self {
            Outcome::Ok(_) => OutcomeStatus::Ok,
            Outcome::UpstreamUnreachable(_) => OutcomeStatus::UpstreamUnreachable,
            Outcome::Timeout => OutcomeStatus::Timeout,
            Outcome::UpstreamError(_) => OutcomeStatus::UpstreamError,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }
}

/// What the orchestrator hands back for one forwarded request.
#[derive(Debug, Clone, PartialEq)]
pub struct CallOutcome {
    pub outcome: Outcome,
    /// Number of upstream calls made, in `1..=max_attempts`.
    pub attempts_made: u32,
    /// Wall-clock time from the first attempt to the final decision, delays included.
    pub elapsed: Duration,
}

impl CallOutcome {
    /// Attempts beyond the first.
    pub fn retries(&self) -> u32 {
        debug_assert!(self.attempts_made >= 1, "a call makes at least one attempt");
        self.attempts_made.saturating_sub(1)
    }

    /// Elapsed time rounded to the nearest millisecond.
    pub fn elapsed_ms(&self) -> u64 {
        (self.elapsed.as_secs_f64() * 1000.0).round() as u64
    }
}
