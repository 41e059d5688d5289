// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::comparison_service::ComparisonService;
use crate::application::dataset_service::load_dataset;
use crate::application::fact_sheet_service::FactSheetService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::csv_repository::CsvRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    compare_view, export_view, health_check, list_motors, motor_fact_sheet,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(CsvRepository::new(config.data.clone()));

    // Load and reconcile the measurement tables once
    let dataset = load_dataset(repository.as_ref(), &config.analysis)
        .await
        .with_context(|| {
            format!(
                "Cannot start dashboard from data directory '{}'",
                config.data.dir
            )
        })?;
    let dataset = Arc::new(dataset);

    // Create services (application layer)
    let comparison_service = ComparisonService::new(dataset.clone(), config.analysis.clone());
    let fact_sheet_service = FactSheetService::new(repository.clone(), dataset);

    // Create application state
    let state = Arc::new(AppState {
        comparison_service,
        fact_sheet_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/motors", get(list_motors))
        .route("/motors/:name", get(motor_fact_sheet))
        .route("/views/:view", get(compare_view))
        .route("/views/:view/export", get(export_view))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", config.server.bind))?;
    tracing::info!("Starting motor bench dashboard on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
