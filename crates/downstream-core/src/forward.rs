//! Forwarder: the retry loop bound to the upstream transport.

use crate::config::DownstreamConfig;
use crate::retry::{self, CallOutcome, RetryPolicy};
use crate::upstream::UpstreamClient;
use anyhow::Result;

/// Forwards one logical request to the upstream data endpoint.
///
/// Holds only immutable settings, so one instance can serve concurrent
/// requests; each [`Forwarder::forward`] call runs its own retry sequence.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: UpstreamClient,
    policy: RetryPolicy,
}

impl Forwarder {
    pub fn new(client: UpstreamClient, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    pub fn from_config(cfg: &DownstreamConfig) -> Result<Self> {
        let policy = cfg.retry_policy()?;
        let client = UpstreamClient::new(&cfg.upstream_url, policy.attempt_timeout)?;
        Ok(Self::new(client, policy))
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn client(&self) -> &UpstreamClient {
        &self.client
    }

    pub async fn forward(&self) -> CallOutcome {
        let call = retry::execute(&self.policy, || self.client.get()).await;
        tracing::info!(
            "forwarded to {}: status={} attempts={} elapsed_ms={}",
            self.client.data_url(),
            call.outcome.status().as_str(),
            call.attempts_made,
            call.elapsed_ms()
        );
        call
    }
}
