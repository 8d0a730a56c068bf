//! mlserve - online inference service
//!
//! Loads the schema manifest and model artifact once, opens the prediction
//! store, and serves `/predict`, `/update`, `/list`, and `/health`.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use mlserve::config::Config;
use mlserve::scorer::LogisticModel;
use mlserve::{build_router, AppState, Manifest};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting mlserve v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::parse();

    let manifest = Manifest::from_file(&config.columns)?;
    info!(
        "Loaded schema manifest: {} columns from {}",
        manifest.len(),
        config.columns.display()
    );

    let model = LogisticModel::from_file(&config.model)?;
    info!("Loaded model artifact from {}", config.model.display());

    let pool = mlserve::db::init_pool(&config.database).await?;
    info!("Prediction store ready at {}", config.database.display());

    let state = AppState::new(pool, Arc::new(manifest), Arc::new(model));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("mlserve listening on http://{}", config.bind);
    info!("Health check: http://{}/health", config.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
