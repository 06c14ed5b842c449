//! Model Host
//!
//! Serves predictions from pluggable models selected by configuration.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use modelhost_server::cli::Cli;
use modelhost_server::{create_router, AppState, ServerConfig};
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = ServerConfig::load(&cli.config, &cli)?;

    // Initialize tracing
    init_tracing(cli.verbose || config.environment.debug());

    info!("Starting Model Host");
    info!("Environment: {}", config.environment);
    info!("Configured models: {}", config.models.len());

    // Initialize metrics
    let metrics_handle = init_metrics()?;

    // Load phase: every configured model is loaded before the listener binds
    let state = AppState::new(config, Some(metrics_handle))?;

    let addr: SocketAddr = state.config.bind_address().parse()?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            warn!("Shutdown signal received, stopping server...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("modelhost=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("modelhost=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "modelhost_requests_total",
        "Total number of API requests by endpoint"
    );
    metrics::describe_counter!(
        "modelhost_predictions_total",
        "Total number of predictions by model and outcome"
    );
    metrics::describe_histogram!(
        "modelhost_prediction_latency_us",
        metrics::Unit::Microseconds,
        "Prediction latency in microseconds by model"
    );
    metrics::describe_counter!("modelhost_errors_total", "Total number of error responses");

    info!("Metrics exporter initialized");
    Ok(handle)
}
