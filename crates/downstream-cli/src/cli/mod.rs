//! CLI for the downstream forwarder.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use downstream_core::config::{self, DownstreamConfig};

use commands::{run_call, run_serve, run_stub_upstream};

/// Top-level CLI for the downstream forwarder.
#[derive(Debug, Parser)]
#[command(name = "downstream")]
#[command(about = "Downstream service: forwards requests upstream with bounded retries", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run the HTTP server (`GET /` forwards upstream, `GET /health`).
    Serve {
        /// Address to listen on (overrides config and LISTEN_ADDR).
        #[arg(long, value_name = "ADDR")]
        listen: Option<String>,
        /// Upstream base URL (overrides config and UPSTREAM_URL).
        #[arg(long, value_name = "URL")]
        upstream: Option<String>,
    },

    /// Forward a single request and print the JSON response.
    Call {
        /// Upstream base URL (overrides config and UPSTREAM_URL).
        #[arg(long, value_name = "URL")]
        upstream: Option<String>,
    },

    /// Run a stub upstream service for local testing.
    Upstream {
        /// Address to listen on.
        #[arg(long, default_value = "0.0.0.0:7000", value_name = "ADDR")]
        listen: String,
        /// Drain in-flight requests on SIGTERM/SIGINT instead of stopping immediately.
        #[arg(long, env = "GRACEFUL", value_parser = clap::builder::BoolishValueParser::new())]
        graceful: bool,
    },
}

/// Loads config with command-line overrides applied on top of file and environment.
fn load_config(listen: Option<String>, upstream: Option<String>) -> Result<DownstreamConfig> {
    let cfg = config::load_or_init_with(|cfg| {
        if let Some(addr) = listen {
            cfg.listen_addr = addr;
        }
        if let Some(url) = upstream {
            cfg.upstream_url = url;
        }
    })?;
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Serve { listen, upstream } => {
                let cfg = load_config(listen, upstream)?;
                run_serve(&cfg).await?;
            }
            CliCommand::Call { upstream } => {
                let cfg = load_config(None, upstream)?;
                run_call(&cfg).await?;
            }
            CliCommand::Upstream { listen, graceful } => run_stub_upstream(&listen, graceful).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
