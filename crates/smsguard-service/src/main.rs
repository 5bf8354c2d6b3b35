//! SmsGuard Service
//!
//! HTTP service exposing a pre-trained SMS spam classifier.
//!
//! On startup the service guarantees the model artifact is present locally
//! (downloading it from the configured URL on a cache miss), deserializes it
//! into memory once, and then serves `POST /predict` against the immutable
//! model for the life of the process.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::signal;
use tracing::{info, warn};

mod config;
mod routes;
mod state;

use config::ServiceConfig;
use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "smsguard-service")]
#[command(about = "SMS spam detection model service", long_about = None)]
struct Cli {
    /// Local directory for cached model artifacts
    #[arg(long, env = "MODEL_DIR", default_value = "/models")]
    model_dir: PathBuf,

    /// Artifact filename within the model directory
    #[arg(long, env = "MODEL_FILE", default_value = "model.joblib")]
    model_file: String,

    /// Remote source to fetch the artifact from on cache miss
    #[arg(long, env = "MODEL_URL")]
    model_url: Option<String>,

    /// Listen port; binds on all interfaces
    #[arg(short = 'P', long, env = "MODEL_SERVICE_PORT", default_value = "8080")]
    port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("Starting SmsGuard service");

    let config = ServiceConfig::from_cli(&cli);
    info!(model_path = %config.model_path().display(), "Configuration loaded");

    let metrics_handle = init_metrics()?;

    // Provision the artifact and load the model before any socket is bound;
    // a failure here aborts the process.
    let state = AppState::new(config.clone(), metrics_handle).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    warn!("Shutdown signal received, stopping server...");
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("smsguard_service=debug,smsguard_model=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("smsguard_service=info,smsguard_model=info"))
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
        "smsguard_requests_total",
        "Total number of prediction requests received"
    );
    metrics::describe_counter!(
        "smsguard_predictions_total",
        "Total number of predictions by label"
    );
    metrics::describe_counter!(
        "smsguard_errors_total",
        "Total number of request errors by kind"
    );
    metrics::describe_histogram!(
        "smsguard_inference_latency_us",
        metrics::Unit::Microseconds,
        "Inference latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
