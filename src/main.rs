//! Standalone mock server.
//!
//! Serves the rules of a TOML fixture file until Ctrl+C, answering each
//! request with the next queued response of the first matching rule.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use mock_dispatch::config::load_config;
use mock_dispatch::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "mock-dispatch")]
#[command(about = "Serve queued mock responses from a fixture file", long_about = None)]
struct Cli {
    /// Fixture file (TOML).
    #[arg(short, long)]
    config: PathBuf,

    /// Override the fixture's bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override the fixture's log level.
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut config = load_config(&cli.config)?;
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }
    if let Some(level) = cli.log_level {
        config.server.log_level = level;
    }

    init_logging(&config.server.log_level)?;

    tracing::info!(
        path = ?cli.config,
        rules = config.rules.len(),
        failure_status = config.server.failure_status,
        "Fixture loaded"
    );

    let dispatcher = config.to_responses().into_dispatcher();
    let app = dispatcher
        .clone()
        .router_with(config.server.handler_config());

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    match dispatcher.verify() {
        Ok(()) => tracing::info!("All mock responses consumed"),
        Err(e) => tracing::warn!(error = %e, "Mock server stopped with outstanding expectations"),
    }
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
