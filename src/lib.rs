//! Hackathon backends for flight catering operations.
//!
//! Two servers share this crate:
//! - the catering server: flight roster, product freshness and expiration
//!   analysis, operator productivity analytics, and consumption
//!   predictions from a model trained at startup;
//! - the storm server: a weather grid over Mexico backed by Open-Meteo,
//!   plus storm maps and JSON summaries served from the timestamped
//!   snapshot tree written by the external storm tool.

pub mod config;
pub mod core;
pub mod domain;
pub mod routes;
pub mod state;
pub mod store;
pub mod utils;

pub use config::{CateringConfig, StormConfig};
pub use utils::error::{AppError, Result};

use std::time::Duration;

use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::state::{CateringState, StormState};

pub async fn serve_catering(config: CateringConfig) -> anyhow::Result<()> {
    let state = CateringState::new(config);
    state.spawn_model_training();

    let cors = cors_layer(&state.config.allowed_origin)?;
    let app = routes::catering_router(state.clone()).layer(cors);

    serve(app, state.config.port).await
}

pub async fn serve_storm(config: StormConfig) -> anyhow::Result<()> {
    if let Some(path) = &config.snapshot_config {
        let snapshot_toml = config::snapshot::SnapshotToml::from_file(path)?;
        if snapshot_toml.scheduler.enabled {
            tokio::spawn(core::snapshot::run_refresher(snapshot_toml.scheduler));
        } else {
            info!("Snapshot refresher disabled by config");
        }
    }

    let state = StormState::new(config);

    let cors = cors_layer(&state.config.allowed_origin)?;
    let app = routes::storm_router(state.clone()).layer(cors);

    serve(app, state.config.port).await
}

fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    Ok(CorsLayer::new()
        .allow_origin(origin.parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60)))
}

async fn serve(app: axum::Router, port: u16) -> anyhow::Result<()> {
    let address = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
