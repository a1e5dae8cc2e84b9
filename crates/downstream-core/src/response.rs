//! JSON bodies returned to downstream callers.

use crate::retry::{CallOutcome, Outcome, OutcomeStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Body of the forward endpoint. Failures are reported here, never as HTTP errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardResponse {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
    pub status: OutcomeStatus,
    pub retries: u32,
}

impl ForwardResponse {
    /// Shapes a call outcome. `attempt_timeout` is only used to word timeout errors.
    pub fn from_call(source: &str, call: CallOutcome, attempt_timeout: Duration) -> Self {
        let status = call.outcome.status();
        let elapsed_ms = call.elapsed_ms();
        let retries = call.retries();
        let (upstream, error) = match call.outcome {
            Outcome::Ok(payload) => (Some(payload), None),
            Outcome::UpstreamUnreachable(msg) => (None, Some(format!("Connection error: {}", msg))),
            Outcome::Timeout => (
                None,
                Some(format!(
                    "Upstream read timeout ({}s)",
                    attempt_timeout.as_secs_f64()
                )),
            ),
            Outcome::UpstreamError(detail) => (None, Some(detail)),
        };
        Self {
            source: source.to_string(),
            upstream,
            error,
            elapsed_ms,
            status,
            retries,
        }
    }
}

/// Body of the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}
