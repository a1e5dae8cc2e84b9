//! Retry loop: call upstream until a terminal decision or the attempt budget runs out.

use super::classify::{self, AttemptResult, RetryDecision, TransportFailureKind};
use super::outcome::{CallOutcome, Outcome};
use super::policy::RetryPolicy;
use std::future::Future;
use tokio::time::Instant;

/// Runs `upstream_call` under `policy` and returns the final outcome.
///
/// Each attempt is bounded by `policy.attempt_timeout`; an attempt that runs
/// past it is abandoned and treated as a timeout. Between retryable failures
/// the loop sleeps `policy.delay`. Never fails: every failure ends up as an
/// [`Outcome`] in the returned record.
pub async fn execute<F, Fut>(policy: &RetryPolicy, mut upstream_call: F) -> CallOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AttemptResult>,
{
    let start = Instant::now();
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        tracing::debug!("upstream attempt {}/{}", attempt, policy.max_attempts());

        let result = match tokio::time::timeout(policy.attempt_timeout, upstream_call()).await {
            Ok(r) => r,
            Err(_) => AttemptResult::transport(
                TransportFailureKind::Timeout,
                format!("attempt exceeded {:?}", policy.attempt_timeout),
            ),
        };
        let failure = classify::failure_kind(&result, policy);

        match classify::classify(result, policy) {
            RetryDecision::Stop(outcome) => {
                if let Some(kind) = failure {
                    tracing::warn!("attempt {} failed with {}; not retrying", attempt, kind);
                }
                return finish(outcome, attempt, start);
            }
            RetryDecision::Retry(pending) => {
                let kind = failure.map(|k| k.to_string()).unwrap_or_default();
                if !policy.has_budget_after(attempt) {
                    tracing::warn!(
                        "retries exhausted after {} attempts; last failure: {}",
                        attempt,
                        kind
                    );
                    return finish(pending, attempt, start);
                }
                tracing::warn!(
                    "attempt {} failed with {}; retrying in {:?}",
                    attempt,
                    kind,
                    policy.delay
                );
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}

fn finish(outcome: Outcome, attempts_made: u32, start: Instant) -> CallOutcome {
    CallOutcome {
        outcome,
        attempts_made,
        elapsed: start.elapsed(),
    }
}
