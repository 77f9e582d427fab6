// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::DashboardService;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::firestore_repository::FirestoreRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{dashboard, export_csv, health_check};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create repository (infrastructure layer); it also serves the visibility settings
    let repository = Arc::new(FirestoreRepository::new(config.store.clone()));

    // Create services (application layer)
    let dashboard_service = DashboardService::new(repository.clone(), repository);

    let state = Arc::new(AppState { dashboard_service });

    // Build router (presentation layer)
    // Compression is negotiated per response in http_response, not via CompressionLayer
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(dashboard))
        .route("/dashboard/export", get(export_csv))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid server.bind_addr '{}'", config.server.bind_addr))?;
    tracing::info!(
        "Starting submission-dashboard on {} (project {}, collection {})",
        addr,
        config.store.project_id,
        config.store.collection
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
