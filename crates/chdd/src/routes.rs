//! Routes for chdd
//!
//! The HTML form and result page, plus a JSON API for scripted callers.

use crate::pages::{self, FormValues};
use crate::server::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Form, Json, Router,
};
use chd_common::{ChdError, Diagnosis, FeatureRow, ModelMetadata, PipelineSummary};
use chd_common::ui_colors::{format_probability, RiskTone};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

type AppStateArc = Arc<AppState>;

/// Map a predictor error to an HTTP status and a plain-text body
fn reject(request_id: Uuid, err: ChdError) -> (StatusCode, String) {
    if err.is_input_error() {
        warn!(%request_id, code = err.code(), "  Rejected input: {}", err);
        (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
    } else {
        error!(%request_id, code = err.code(), "  Prediction failed: {}", err);
        (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

// ============================================================================
// Form Routes
// ============================================================================

pub fn form_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/", get(form_page))
        .route("/assess", post(assess))
}

async fn form_page(State(state): State<AppStateArc>) -> Html<String> {
    Html(pages::render_page(
        &FormValues::default(),
        None,
        state.predictor.metadata(),
    ))
}

async fn assess(
    State(state): State<AppStateArc>,
    Form(values): Form<FormValues>,
) -> Result<Html<String>, (StatusCode, String)> {
    let request_id = Uuid::new_v4();

    let record = values.parse().map_err(|e| reject(request_id, e))?;
    let assessment = state
        .predictor
        .assess(&record)
        .map_err(|e| reject(request_id, e))?;

    info!(
        %request_id,
        probability = assessment.probability,
        label = assessment.label,
        "  Assessment: {}",
        assessment.diagnosis().badge_text()
    );

    Ok(Html(pages::render_page(
        &values,
        Some(&assessment),
        state.predictor.metadata(),
    )))
}

// ============================================================================
// Predict Routes
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub request_id: Uuid,
    pub probability: f64,
    pub label: u8,
    pub diagnosis: Diagnosis,
    pub percentage: String,
    pub color: String,
}

pub fn predict_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/predict", post(predict))
}

async fn predict(
    State(state): State<AppStateArc>,
    Json(row): Json<FeatureRow>,
) -> Result<Json<PredictResponse>, (StatusCode, String)> {
    let request_id = Uuid::new_v4();

    // The predictor checks row shape, then each field's domain
    let probability = state
        .predictor
        .predict_proba(&row)
        .map_err(|e| reject(request_id, e))?;
    let label = state
        .predictor
        .predict(&row)
        .map_err(|e| reject(request_id, e))?;

    info!(%request_id, probability, label, "  Predicted");

    Ok(Json(PredictResponse {
        request_id,
        probability,
        label,
        diagnosis: Diagnosis::from_label(label),
        percentage: format_probability(probability),
        color: RiskTone::from_probability(probability).hex(),
    }))
}

// ============================================================================
// Health Routes
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResponse {
    pub metadata: ModelMetadata,
    pub summary: PipelineSummary,
    pub source: Option<String>,
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/health", get(health_check))
        .route("/v1/model", get(model_info))
}

async fn health_check(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        model: state.predictor.metadata().name.clone(),
    })
}

async fn model_info(State(state): State<AppStateArc>) -> Json<ModelResponse> {
    Json(ModelResponse {
        metadata: state.predictor.metadata().clone(),
        summary: state.predictor.summary(),
        source: state
            .predictor
            .source()
            .map(|p| p.display().to_string()),
    })
}
