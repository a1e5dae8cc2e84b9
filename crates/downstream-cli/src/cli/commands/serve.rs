//! `downstream serve` – run the forwarding HTTP server.

use crate::http::{downstream, shutdown};
use anyhow::{Context, Result};
use downstream_core::config::DownstreamConfig;
use downstream_core::Forwarder;
use std::sync::Arc;

pub async fn run_serve(cfg: &DownstreamConfig) -> Result<()> {
    let forwarder = Forwarder::from_config(cfg)?;
    tracing::info!(
        "forwarding to {} (max_attempts={}, delay={:?}, attempt_timeout={:?})",
        forwarder.client().data_url(),
        forwarder.policy().max_attempts(),
        forwarder.policy().delay,
        forwarder.policy().attempt_timeout
    );
    let state = Arc::new(downstream::AppState::new(forwarder, cfg.source_name.clone()));

    let listener = tokio::net::TcpListener::bind(cfg.listen_addr.as_str())
        .await
        .with_context(|| format!("binding {}", cfg.listen_addr))?;
    tracing::info!("listening on {}", cfg.listen_addr);

    axum::serve(listener, downstream::router(state))
        .with_graceful_shutdown(async {
            let sig = shutdown::wait_for_signal().await;
            tracing::info!("received {}, shutting down", sig);
        })
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}
