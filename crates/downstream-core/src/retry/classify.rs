//! Classify one attempt's result into a retry decision.

use super::outcome::Outcome;
use super::policy::RetryPolicy;
use serde_json::Value;
use std::fmt;

/// Transport-level failure category, decided by the transport before classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportFailureKind {
    /// Connection refused/reset, DNS failure, peer hung up.
    Connect,
    /// Attempt exceeded its time limit.
    Timeout,
    /// Anything else (bad URL, TLS setup, ...).
    Other,
}

/// Result of a single upstream attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptResult {
    Success { status: u16, payload: Value },
    TransportFailure { kind: TransportFailureKind, message: String },
    HttpFailure { status: u16 },
    /// 2xx response whose body could not be parsed.
    MalformedBody { status: u16, detail: String },
}

impl AttemptResult {
    pub fn success(status: u16, payload: Value) -> Self {
        AttemptResult::Success { status, payload }
    }

    pub fn transport(kind: TransportFailureKind, message: impl Into<String>) -> Self {
        AttemptResult::TransportFailure {
            kind,
            message: message.into(),
        }
    }

    pub fn http(status: u16) -> Self {
        AttemptResult::HttpFailure { status }
    }
}

/// Per-attempt failure class, used for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    TransportConnect,
    TransportTimeout,
    TransportOther,
    /// 4xx and other non-5xx statuses outside the retryable set.
    ClientError,
    RetryableServerError,
    NonRetryableServerError,
    MalformedBody,
}

impl FailureKind {
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            FailureKind::TransportConnect
                | FailureKind::TransportTimeout
                | FailureKind::RetryableServerError
        )
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::TransportConnect => "connect error",
            FailureKind::TransportTimeout => "timeout",
            FailureKind::TransportOther => "transport error",
            FailureKind::ClientError => "client error",
            FailureKind::RetryableServerError => "retryable server error",
            FailureKind::NonRetryableServerError => "non-retryable server error",
            FailureKind::MalformedBody => "malformed body",
        };
        f.write_str(s)
    }
}

/// Decision for one attempt. Both variants carry the outcome that ends the
/// call: `Stop` immediately, `Retry` only if the attempt budget runs out.
#[derive(Debug, Clone, PartialEq)]
pub enum RetryDecision {
    Stop(Outcome),
    Retry(Outcome),
}

impl RetryDecision {
    pub fn should_retry(&self) -> bool {
        matches!(self, RetryDecision::Retry(_))
    }

    pub fn into_outcome(self) -> Outcome {
        match self {
            RetryDecision::Stop(o) | RetryDecision::Retry(o) => o,
        }
    }
}

/// Classify an HTTP failure status against the policy's retryable set.
pub fn classify_http_status(status: u16, policy: &RetryPolicy) -> FailureKind {
    if policy.is_retryable_status(status) {
        FailureKind::RetryableServerError
    } else if (500..=599).contains(&status) {
        FailureKind::NonRetryableServerError
    } else {
        FailureKind::ClientError
    }
}

/// Failure class of an attempt, or `None` for a success.
pub fn failure_kind(result: &AttemptResult, policy: &RetryPolicy) -> Option<FailureKind> {
    match result {
        AttemptResult::Success { .. } => None,
        AttemptResult::TransportFailure { kind, .. } => Some(match kind {
            TransportFailureKind::Connect => FailureKind::TransportConnect,
            TransportFailureKind::Timeout => FailureKind::TransportTimeout,
            TransportFailureKind::Other => FailureKind::TransportOther,
        }),
        AttemptResult::HttpFailure { status } => Some(classify_http_status(*status, policy)),
        AttemptResult::MalformedBody { .. } => Some(FailureKind::MalformedBody),
    }
}

/// Classify an attempt result. Pure; the attempt budget is the caller's concern.
pub fn classify(result: AttemptResult, policy: &RetryPolicy) -> RetryDecision {
    let kind = failure_kind(&result, policy);
    let outcome = match result {
        AttemptResult::Success { payload, .. } => return RetryDecision::Stop(Outcome::Ok(payload)),
        AttemptResult::TransportFailure {
            kind: TransportFailureKind::Timeout,
            ..
        } => Outcome::Timeout,
        AttemptResult::TransportFailure { message, .. } => Outcome::UpstreamUnreachable(message),
        AttemptResult::HttpFailure { status } => {
            Outcome::UpstreamError(format!("Upstream returned {}", status))
        }
        AttemptResult::MalformedBody { status, detail } => Outcome::UpstreamError(format!(
            "Upstream returned {} with malformed body: {}",
            status, detail
        )),
    };
    match kind {
        Some(k) if k.is_retryable() => RetryDecision::Retry(outcome),
        _ => RetryDecision::Stop(outcome),
    }
}
