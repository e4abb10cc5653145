mod config;
mod dataset;
mod error;
mod extract;
mod routes;
mod state;
mod stats;

use config::Config;
use state::AppState;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let explicit_config = std::env::var("REGION_METRICS_CONFIG").ok();
    let cfg = Config::load(explicit_config.as_deref(), "config.toml")?;

    // The service must not start without a parsed dataset.
    let dataset_path = cfg.resolve_dataset_path(std::env::var("REGION_METRICS_DATASET").ok());
    let state = Arc::new(AppState::from_config(&cfg, &dataset_path)?);

    let app = routes::build_router(state, cfg.max_request_body_bytes());

    let addr: SocketAddr = cfg.listen().parse()?;
    info!(%addr, "Starting region-metrics");

    let server = axum::Server::bind(&addr).serve(app.into_make_service());

    let graceful = server.with_graceful_shutdown(shutdown_signal());
    graceful.await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = signal::ctrl_c().await;
    info!("Shutdown signal received");
}
