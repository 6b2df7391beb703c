//! Integration tests for the analytics HTTP API.
//!
//! Drive the axum router directly, no socket involved.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use smire_analytics::{
    api::{create_router, ApiState, HomePage},
    create_default_registry, PaymentsAnalytics, RecordStore,
};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tower::ServiceExt;

const DATASET: &str = r#"[
    {"month": "Oct-24", "pillar": "F&B", "product_type": "QRIS", "brand_id": "B1", "merchant_name": "Kopi Kita", "tpv": "1,000", "tpt": "10", "Churn_Prediction": "Critical Risk", "Churn_Status": "RISK"},
    {"month": "Oct-24", "pillar": "Retail", "product_type": "VA", "brand_id": "B2", "merchant_name": "Toko Maju", "tpv": "3,000", "tpt": "30", "Churn_Prediction": "Stable", "Churn_Status": "SAFE"},
    {"month": "Nov-24", "pillar": "F&B", "product_type": "QRIS", "brand_id": "B1", "merchant_name": "Kopi Kita", "tpv": "2,000", "tpt": "15"}
]"#;

/// Helper to build the app over a dataset file and a home page template.
fn create_test_app(dataset: &str, template: &NamedTempFile) -> Router {
    let store = RecordStore::from_json_slice(dataset.as_bytes()).unwrap();
    let record_count = store.len();
    let registry = create_default_registry(Arc::new(PaymentsAnalytics::new(store)));

    create_router(ApiState {
        registry: Arc::new(registry),
        home: Arc::new(HomePage::new(template.path(), "https://hooks.example/chat")),
        record_count,
    })
}

fn template() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"<html><body data-webhook=\"{{CHAT_WEBHOOK_URL}}\"></body></html>")
        .unwrap();
    file
}

/// Helper to make a request to the router and decode the body.
async fn request(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, bytes.to_vec())
}

async fn json_request(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, bytes) = request(app, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_reports_record_count() {
    let template = template();
    let app = create_test_app(DATASET, &template);

    let (status, body) = json_request(app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["records"], 3);
}

#[tokio::test]
async fn test_list_tools() {
    let template = template();
    let app = create_test_app(DATASET, &template);

    let (status, body) = json_request(app, "GET", "/api/tools", None).await;

    assert_eq!(status, StatusCode::OK);
    let tools = body.as_array().unwrap();
    assert_eq!(tools.len(), 9);
    assert!(tools
        .iter()
        .any(|t| t["function"]["name"] == "churn_prediction_analysis"));
}

#[tokio::test]
async fn test_summary_tool() {
    let template = template();
    let app = create_test_app(DATASET, &template);

    let (status, body) = json_request(
        app,
        "POST",
        "/api/tools/summary",
        Some(json!({"month": "Oct-24", "pillar": "F&B"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["metric"], "Transaction Summary");
    assert_eq!(body["data"]["Total_TPV"], json!(1000.0));
    assert_eq!(body["data"]["Total_TPT"], json!(10.0));
}

#[tokio::test]
async fn test_monthly_growth_tool() {
    let template = template();
    let app = create_test_app(DATASET, &template);

    let (status, body) = json_request(
        app,
        "POST",
        "/api/tools/monthly_growth",
        Some(json!({"month_a": "Oct-24", "month_b": "Nov-24", "brand_id": "b1"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["TPV_A"], json!(1000.0));
    assert_eq!(body["data"]["TPV_B"], json!(2000.0));
    assert_eq!(body["data"]["TpvGrowthPct"], "100.00%");
}

#[tokio::test]
async fn test_churn_tools_without_body_use_latest_month() {
    let template = template();
    let app = create_test_app(DATASET, &template);

    let (status, body) =
        json_request(app.clone(), "POST", "/api/tools/churn_candidates", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["filters"]["month"], "Nov-24");
    assert_eq!(body["data"]["total_candidates"], 0);

    let (status, body) = json_request(
        app,
        "POST",
        "/api/tools/churn_prediction_analysis",
        Some(json!({"month": "Oct-24"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["Total_Merchant_Count"], 2);
    assert_eq!(body["data"]["Summary"]["Critical Risk"], 1);
    assert_eq!(
        body["data"]["Potentially_Churning_Merchants"][0]["brand_id"],
        "B1"
    );
}

#[tokio::test]
async fn test_invalid_month_is_bad_request() {
    let template = template();
    let app = create_test_app(DATASET, &template);

    let (status, body) = json_request(
        app,
        "POST",
        "/api/tools/product_mix",
        Some(json!({"month": "2024-10"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("Mon-YY"));
}

#[tokio::test]
async fn test_body_without_content_type_is_honoured() {
    let template = template();
    let app = create_test_app(DATASET, &template);

    let req = Request::builder()
        .method("POST")
        .uri("/api/tools/churn_candidates")
        .body(Body::from(r#"{"month":"Oct-24"}"#))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["filters"]["month"], "Oct-24");
    assert_eq!(body["data"]["brand_ids"], json!(["B1"]));
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let template = template();
    let app = create_test_app(DATASET, &template);

    let req = Request::builder()
        .method("POST")
        .uri("/api/tools/churn_candidates")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"month":"Oct-24""#))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("not valid JSON"));
}

#[tokio::test]
async fn test_unknown_tool_is_not_found() {
    let template = template();
    let app = create_test_app(DATASET, &template);

    let (status, body) =
        json_request(app, "POST", "/api/tools/does_not_exist", Some(json!({}))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("does_not_exist"));
}

#[tokio::test]
async fn test_empty_dataset_still_answers() {
    let template = template();
    let app = create_test_app("[]", &template);

    let (status, body) = json_request(
        app,
        "POST",
        "/api/tools/summary",
        Some(json!({"month": "Oct-24"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["Total_TPV"], json!(0.0));
    assert_eq!(body["data"]["Total_TPT"], json!(0.0));
}

#[tokio::test]
async fn test_home_page_substitutes_webhook_url() {
    let template = template();
    let app = create_test_app(DATASET, &template);

    let (status, bytes) = request(app, "GET", "/", None).await;
    let html = String::from_utf8(bytes).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("data-webhook=\"https://hooks.example/chat\""));
    assert!(!html.contains("{{CHAT_WEBHOOK_URL}}"));
}
