//! Main entry point for the diskproxy server.
//!
//! Parses command-line arguments, wires the provider client and the
//! listing cache into the shared application state, and serves the
//! router until interrupted.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use diskproxy::{AppState, Cli, DiskClient, ListingCache, router};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG overrides the -v flags when set.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::from_level(cli.log_level()).into())
                .from_env_lossy(),
        )
        .init();

    let state = Arc::new(AppState {
        client: DiskClient::new(cli.api_base.clone())?,
        cache: ListingCache::new(Duration::from_secs(cli.cache_ttl)),
    });

    let listener = TcpListener::bind(cli.listen).await?;
    tracing::info!(listen = %cli.listen, api_base = %cli.api_base, "diskproxy listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutting down");
}
