//! HTTP server for chdd

use crate::routes;
use anyhow::{Context, Result};
use axum::Router;
use chd_common::{Config, RiskPredictor};
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    /// Loaded once at startup, read-only afterwards
    pub predictor: RiskPredictor,
    pub config: Config,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(predictor: RiskPredictor, config: Config) -> Self {
        Self {
            predictor,
            config,
            start_time: Instant::now(),
        }
    }
}

/// Build the full router (also used directly by tests)
pub fn router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .merge(routes::form_routes())
        .merge(routes::predict_routes())
        .merge(routes::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server
pub async fn run(state: AppState) -> Result<()> {
    let addr = state.config.server.bind.clone();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("[READY] Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
