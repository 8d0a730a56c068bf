//! mlserve library - online inference service
//!
//! Accepts feature observations over HTTP, coerces them onto the model's
//! expected schema, scores them, and persists each scored observation keyed by
//! a caller-supplied identifier. Ground-truth labels close the feedback loop
//! via `/update`. At most one stored prediction per identifier, enforced by
//! the store's uniqueness constraint.

use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod coerce;
pub mod config;
pub mod db;
pub mod error;
pub mod schema;
pub mod scorer;

pub use error::{ApiError, ApiResult};
pub use schema::Manifest;
pub use scorer::Scorer;

/// Application state shared across HTTP handlers.
///
/// The manifest and scorer are loaded once at startup and immutable for the
/// process lifetime; the pool is the only cross-request coordination point.
#[derive(Clone)]
pub struct AppState {
    /// Prediction store connection pool
    pub db: SqlitePool,
    /// Expected feature columns and kinds
    pub manifest: Arc<Manifest>,
    /// Trained classifier
    pub scorer: Arc<dyn Scorer>,
}

impl AppState {
    pub fn new(db: SqlitePool, manifest: Arc<Manifest>, scorer: Arc<dyn Scorer>) -> Self {
        Self { db, manifest, scorer }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/predict", post(api::predict))
        .route("/update", post(api::update))
        .route("/list", get(api::list))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
