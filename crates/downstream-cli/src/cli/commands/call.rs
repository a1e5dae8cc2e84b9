//! `downstream call` – forward one request and print the response body.

use anyhow::Result;
use downstream_core::config::DownstreamConfig;
use downstream_core::response::ForwardResponse;
use downstream_core::Forwarder;

pub async fn run_call(cfg: &DownstreamConfig) -> Result<()> {
    let forwarder = Forwarder::from_config(cfg)?;
    let call = forwarder.forward().await;
    let body = ForwardResponse::from_call(
        &cfg.source_name,
        call,
        forwarder.policy().attempt_timeout,
    );
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
