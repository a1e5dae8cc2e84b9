//! Integration test: forwarder against a local scripted upstream.
//!
//! Drives real curl transfers through the retry loop and checks both the
//! call outcome and the number of requests the upstream actually received.

mod common;

use common::scripted_server::{self, json, Reply};
use downstream_core::response::ForwardResponse;
use downstream_core::retry::{Outcome, OutcomeStatus, RetryPolicy};
use downstream_core::upstream::UpstreamClient;
use downstream_core::Forwarder;
use serde_json::json as value;
use std::time::Duration;

fn forwarder(base_url: &str, attempt_timeout: Duration) -> Forwarder {
    let policy = RetryPolicy::new(
        3,
        Duration::from_millis(20),
        attempt_timeout,
        [500, 502, 503, 504],
    )
    .unwrap();
    let client = UpstreamClient::new(base_url, attempt_timeout).unwrap();
    Forwarder::new(client, policy)
}

#[tokio::test]
async fn success_without_retries() {
    let srv = scripted_server::start(vec![json(r#"{"msg":"hello"}"#)]);
    let call = forwarder(&srv.base_url, Duration::from_secs(2)).forward().await;
    assert_eq!(call.outcome, Outcome::Ok(value!({"msg": "hello"})));
    assert_eq!(call.retries(), 0);
    assert_eq!(srv.hits(), 1);
}

#[tokio::test]
async fn bad_gateway_then_success() {
    let srv = scripted_server::start(vec![
        Reply::Status(502, "Bad Gateway"),
        json(r#"{"msg":"ok now"}"#),
    ]);
    let call = forwarder(&srv.base_url, Duration::from_secs(2)).forward().await;
    assert_eq!(call.outcome, Outcome::Ok(value!({"msg": "ok now"})));
    assert_eq!(call.retries(), 1);
    assert_eq!(srv.hits(), 2);
}

#[tokio::test]
async fn hangup_then_success_recovers() {
    let srv = scripted_server::start(vec![Reply::Hangup, json(r#"{"msg":"recovered"}"#)]);
    let call = forwarder(&srv.base_url, Duration::from_secs(2)).forward().await;
    assert_eq!(call.outcome, Outcome::Ok(value!({"msg": "recovered"})));
    assert_eq!(call.retries(), 1);
    assert_eq!(srv.hits(), 2);
}

#[tokio::test]
async fn mixed_failures_then_success() {
    let srv = scripted_server::start(vec![
        Reply::Hangup,
        Reply::Status(503, "Unavailable"),
        json(r#"{"msg":"third time lucky"}"#),
    ]);
    let call = forwarder(&srv.base_url, Duration::from_secs(2)).forward().await;
    assert!(call.outcome.is_ok());
    assert_eq!(call.attempts_made, 3);
    assert_eq!(call.retries(), 2);
    assert_eq!(srv.hits(), 3);
}

#[tokio::test]
async fn connection_refused_exhausts_retries() {
    let base = scripted_server::closed_base_url();
    let fwd = forwarder(&base, Duration::from_secs(2));
    let call = fwd.forward().await;
    assert_eq!(call.outcome.status(), OutcomeStatus::UpstreamUnreachable);
    assert_eq!(call.attempts_made, 3);
    assert!(call.elapsed >= Duration::from_millis(40));

    let body = ForwardResponse::from_call("downstream", call, fwd.policy().attempt_timeout);
    assert_eq!(body.retries, 2);
    assert!(body.error.unwrap().contains("Connection error"));
}

#[tokio::test]
async fn service_unavailable_exhausts_retries() {
    let srv = scripted_server::start(vec![Reply::Status(503, "Service Unavailable")]);
    let call = forwarder(&srv.base_url, Duration::from_secs(2)).forward().await;
    assert_eq!(call.outcome, Outcome::UpstreamError("Upstream returned 503".into()));
    assert_eq!(call.retries(), 2);
    assert_eq!(srv.hits(), 3);
}

#[tokio::test]
async fn not_found_not_retried() {
    let srv = scripted_server::start(vec![Reply::Status(404, "Not Found")]);
    let call = forwarder(&srv.base_url, Duration::from_secs(2)).forward().await;
    assert_eq!(call.outcome, Outcome::UpstreamError("Upstream returned 404".into()));
    assert_eq!(call.retries(), 0);
    assert_eq!(srv.hits(), 1);
}

#[tokio::test]
async fn bad_request_not_retried() {
    let srv = scripted_server::start(vec![Reply::Status(400, "Bad Request")]);
    let call = forwarder(&srv.base_url, Duration::from_secs(2)).forward().await;
    assert_eq!(call.outcome.status(), OutcomeStatus::UpstreamError);
    assert_eq!(call.attempts_made, 1);
    assert_eq!(srv.hits(), 1);
}

#[tokio::test]
async fn stalled_upstream_times_out_then_recovers() {
    let srv = scripted_server::start(vec![
        Reply::Stall(Duration::from_secs(2)),
        json(r#"{"msg":"ok"}"#),
    ]);
    let call = forwarder(&srv.base_url, Duration::from_millis(300)).forward().await;
    assert_eq!(call.outcome, Outcome::Ok(value!({"msg": "ok"})));
    assert_eq!(call.retries(), 1);
    assert!(call.elapsed >= Duration::from_millis(300));
}

#[tokio::test]
async fn stalled_upstream_exhausts_to_timeout() {
    let srv = scripted_server::start(vec![Reply::Stall(Duration::from_secs(2))]);
    let call = forwarder(&srv.base_url, Duration::from_millis(200)).forward().await;
    assert_eq!(call.outcome, Outcome::Timeout);
    assert_eq!(call.attempts_made, 3);
}

#[tokio::test]
async fn malformed_success_body_is_upstream_error() {
    let srv = scripted_server::start(vec![Reply::Status(200, "<html>oops</html>")]);
    let call = forwarder(&srv.base_url, Duration::from_secs(2)).forward().await;
    assert_eq!(call.outcome.status(), OutcomeStatus::UpstreamError);
    assert_eq!(call.attempts_made, 1);
    assert_eq!(srv.hits(), 1);
}

#[tokio::test]
async fn concurrent_forwards_are_independent() {
    let srv = scripted_server::start(vec![json(r#"{"msg":"hi"}"#)]);
    let fwd = forwarder(&srv.base_url, Duration::from_secs(2));
    let (a, b) = tokio::join!(fwd.forward(), fwd.forward());
    assert_eq!(a.attempts_made, 1);
    assert_eq!(b.attempts_made, 1);
    assert_eq!(srv.hits(), 2);
}
