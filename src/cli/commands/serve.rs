//! Implementation of the `review-roster serve` command.

use anyhow::{Context, Result};
use clap::Args;

use crate::adapters::http::HttpServer;
use crate::cli::context::AppContext;
use crate::domain::models::Config;

/// Arguments for `serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Host to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(long, short)]
    pub port: Option<u16>,
}

/// Run the HTTP API until Ctrl-C.
pub async fn execute(args: ServeArgs, mut config: Config) -> Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let ctx = AppContext::open(config).await?;
    let (state, config) = ctx.into_http_state();

    HttpServer::new(state, config.server)
        .serve_with_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %err, "failed to listen for shutdown signal");
            }
        })
        .await
        .map_err(|err| anyhow::anyhow!(err))
        .context("HTTP server failed")
}
