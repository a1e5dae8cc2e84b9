//! `downstream upstream` – run the stub upstream service.

use crate::http::{shutdown, stub_upstream};
use anyhow::{Context, Result};
use std::future::IntoFuture;

pub async fn run_stub_upstream(listen: &str, graceful: bool) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .with_context(|| format!("binding {}", listen))?;

    if !graceful {
        tracing::info!("starting stub upstream in non-graceful mode on {}", listen);
        tokio::select! {
            res = axum::serve(listener, stub_upstream::router()).into_future() => {
                res.context("server error")?;
            }
            sig = shutdown::wait_for_signal() => {
                tracing::warn!("received {}, stopping without drain", sig);
            }
        }
        return Ok(());
    }

    tracing::info!("starting stub upstream in graceful mode on {}", listen);
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(
        axum::serve(listener, stub_upstream::router())
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .into_future(),
    );

    let sig = shutdown::wait_for_signal().await;
    tracing::info!(
        "received {}, draining in-flight requests for up to {:?}",
        sig,
        stub_upstream::DRAIN_LIMIT
    );
    let _ = stop_tx.send(());

    match tokio::time::timeout(stub_upstream::DRAIN_LIMIT, server).await {
        Ok(joined) => {
            joined.context("server task")?.context("server error")?;
            tracing::info!("stub upstream exited gracefully");
        }
        Err(_) => tracing::warn!("drain limit reached, forcing shutdown"),
    }
    Ok(())
}
