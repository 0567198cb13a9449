//! Router tests: every route driven through `oneshot` against the shipped artifact.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chd_common::{Config, RiskPredictor};
use chdd::routes::{HealthResponse, ModelResponse, PredictResponse};
use chdd::{router, AppState};
use http_body_util::BodyExt;
use std::path::PathBuf;
use tower::ServiceExt;

const EXAMPLE_FORM: &str = "sbp=140&ldl=4&adiposity=25&obesity=30&age=50&famhist=Present";

fn app() -> Router {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../models/chd_pipeline.json");
    let predictor = RiskPredictor::load(path).expect("shipped artifact loads");
    router(AppState::new(predictor, Config::default()))
}

async fn send(request: Request<Body>) -> (StatusCode, String) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn post_form(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/assess")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_json(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

// ============================================================================
// Form page
// ============================================================================

#[tokio::test]
async fn test_form_page_has_six_bounded_inputs() {
    let (status, html) = send(get("/")).await;
    assert_eq!(status, StatusCode::OK);
    for name in ["sbp", "ldl", "adiposity", "obesity", "age", "famhist"] {
        assert!(html.contains(&format!("name=\"{}\"", name)), "missing {}", name);
    }
    assert_eq!(html.matches(" required").count(), 6);
    assert!(html.contains("min=\"80\" max=\"250\""));
    assert!(html.contains("Logistic regression + PCA"));
    assert!(!html.contains("id=\"results\""));
}

#[tokio::test]
async fn test_assess_example_renders_results() {
    let (status, html) = send(post_form(EXAMPLE_FORM)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("id=\"results\""));
    assert!(html.contains("low risk") || html.contains("elevated risk"));
    assert!(html.contains("50 years"));
    assert!(html.contains("Consult a healthcare professional"));
    // Submitted values stay in the form
    assert!(html.contains("name=\"sbp\" min=\"80\" max=\"250\" step=\"1\" value=\"140\""));
}

#[tokio::test]
async fn test_assess_accepts_lowercase_famhist() {
    let (status, html) = send(post_form(
        "sbp=140&ldl=4&adiposity=25&obesity=30&age=50&famhist=present",
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<option value=\"Present\" selected>"));
}

#[tokio::test]
async fn test_forged_out_of_range_rejected() {
    let (status, body) = send(post_form(
        "sbp=140&ldl=4&adiposity=25&obesity=30&age=150&famhist=Present",
    ))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("age"));
}

#[tokio::test]
async fn test_missing_form_field_rejected() {
    let (status, _) = send(post_form("sbp=140&ldl=4&adiposity=25&obesity=30&age=50")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_unknown_famhist_rejected() {
    let (status, body) = send(post_form(
        "sbp=140&ldl=4&adiposity=25&obesity=30&age=50&famhist=Maybe",
    ))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("Maybe"));
}

// ============================================================================
// JSON API
// ============================================================================

#[tokio::test]
async fn test_predict_json() {
    let (status, body) = send(post_json(
        r#"{"sbp": 140, "ldl": 4.0, "adiposity": 25, "obesity": 30, "age": 50, "famhist": "Present"}"#,
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    let response: PredictResponse = serde_json::from_str(&body).unwrap();
    assert!((0.0..=1.0).contains(&response.probability));
    assert_eq!(response.label == 1, response.probability > 0.5);
    let expected = if response.probability > 0.5 { "#d32f2f" } else { "#388e3c" };
    assert_eq!(response.color, expected);
    assert!(response.percentage.ends_with('%'));
}

#[tokio::test]
async fn test_predict_missing_column() {
    let (status, body) = send(post_json(
        r#"{"sbp": 140, "ldl": 4.0, "adiposity": 25, "obesity": 30, "age": 50}"#,
    ))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("famhist"));
}

#[tokio::test]
async fn test_predict_duplicate_and_extra_columns() {
    let (status, _) = send(post_json(
        r#"{"sbp": 140, "sbp": 150, "ldl": 4.0, "adiposity": 25, "obesity": 30, "age": 50, "famhist": "Absent"}"#,
    ))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(post_json(
        r#"{"sbp": 140, "ldl": 4.0, "adiposity": 25, "obesity": 30, "age": 50, "famhist": "Absent", "tobacco": 1}"#,
    ))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("tobacco"));
}

#[tokio::test]
async fn test_predict_values_outside_domain() {
    let (status, body) = send(post_json(
        r#"{"sbp": 1000, "ldl": -50, "adiposity": 25, "obesity": 30, "age": 50.7, "famhist": "Present"}"#,
    ))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("sbp = 1000 is outside"), "{}", body);

    let (status, body) = send(post_json(
        r#"{"sbp": 140, "ldl": 4.0, "adiposity": 25, "obesity": 30, "age": 50.7, "famhist": "Present"}"#,
    ))
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body.contains("'age' expects a whole number"), "{}", body);

    let (status, _) = send(post_json(
        r#"{"sbp": 140, "ldl": 4.0, "adiposity": 25, "obesity": 30, "age": 50.0, "famhist": "Present"}"#,
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
}

// ============================================================================
// Health and model info
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (status, body) = send(get("/v1/health")).await;
    assert_eq!(status, StatusCode::OK);
    let health: HealthResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(health.model, "chd-logreg-pca");
}

#[tokio::test]
async fn test_model_info() {
    let (status, body) = send(get("/v1/model")).await;
    assert_eq!(status, StatusCode::OK);
    let info: ModelResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(info.metadata.dataset, "CHD.csv");
    assert_eq!(info.summary.columns.len(), 6);
    assert!(info.source.is_some());
}
