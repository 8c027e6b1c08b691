//! Memetrix API Server
//!
//! Exposes the screening/decision engine over HTTP: health, metrics,
//! settings, screening, decide, and execute endpoints. The periodic
//! scheduler lives outside this process and drives `/api/tick`.

use std::env;
use std::sync::Arc;
use std::time::Instant;

use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

use memetrix::advisory::{AdvisoryRouter, WorkerPool};
use memetrix::config::{get_environment, Settings, SettingsStore};
use memetrix::core::http::{start_server, AppState};
use memetrix::core::runtime::ScreeningPipeline;
use memetrix::events::TracingEventSink;
use memetrix::logging;
use memetrix::metrics::Metrics;
use memetrix::services::VenueClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    info!("Starting Memetrix API Server");
    info!(environment = %get_environment(), "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);

    // Settings fail fast here; a structurally invalid document never
    // reaches an evaluation.
    let settings = Settings::load()?;
    let settings = Arc::new(SettingsStore::new(settings)?);

    let metrics = Arc::new(Metrics::new()?);
    let sink = Arc::new(TracingEventSink);

    let venue = Arc::new(VenueClient::new(&settings.snapshot().await.venue)?);
    let pool = Arc::new(WorkerPool::new());
    let advisory = Arc::new(AdvisoryRouter::new(pool).with_metrics(metrics.clone()));
    let pipeline = Arc::new(
        ScreeningPipeline::new(settings.clone(), venue.clone(), sink.clone())
            .with_metrics(metrics.clone()),
    );

    let state = AppState {
        settings,
        venue,
        advisory,
        pipeline,
        sink,
        metrics,
        start_time: Arc::new(Instant::now()),
    };

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, state).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
