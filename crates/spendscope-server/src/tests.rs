//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use spendscope_core::test_utils::{sample_sheet, SheetBuilder};
use tower::ServiceExt;

const BOUNDARY: &str = "spendscope-test-boundary";

fn setup_test_app() -> Router {
    create_router(ServerConfig::default())
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn multipart_body(field: &str, file_name: &str, content: &str) -> String {
    format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {content}\r\n\
         --{b}--\r\n",
        b = BOUNDARY,
    )
}

fn upload_request(field: &str, content: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(field, "sheet.csv", content)))
        .unwrap()
}

// ========== Health & Registry Tests ==========

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_list_rules_in_registry_order() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/rules")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let labels: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["label"].as_str().unwrap())
        .collect();
    assert_eq!(
        labels,
        vec![
            "Unit Price Variance",
            "Supplier Overdependence",
            "Missed Volume Discount"
        ]
    );
    assert_eq!(json[1]["key"], "supplier_concentration");
}

// ========== Upload Tests ==========

#[tokio::test]
async fn test_upload_returns_report() {
    let app = setup_test_app();

    let response = app
        .oneshot(upload_request("file", &sample_sheet().to_csv()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;

    let suppliers: Vec<&str> = json["top_suppliers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["Supplier Name"].as_str().unwrap())
        .collect();
    assert_eq!(suppliers, vec!["Acme", "Initech", "Globex"]);

    let outliers = json["outliers"].as_array().unwrap();
    assert_eq!(outliers.len(), 3);
    assert_eq!(outliers[0]["Supplier Name"], "Initech");
    assert_eq!(outliers[0]["Item Name"], "B200 part");
    assert_eq!(outliers[0]["CY vs PY WAP USD (Fiscal)"], 3.0);
    assert_eq!(outliers[2]["Supplier Name"], "Globex");

    assert_eq!(json["actions"][0]["type"], "Renegotiate Pricing");
    assert_eq!(json["actions"][0]["supplier"], "Acme");
    assert_eq!(json["actions"][0]["savings"], "$1,750");
    assert_eq!(json["actions"].as_array().unwrap().len(), 3);

    let insights = json["dynamic_insights"].as_array().unwrap();
    assert_eq!(insights.len(), 3);
    assert_eq!(insights[0]["type"], "Unit Price Variance");
    assert_eq!(insights[0]["item"], "A100");
    assert_eq!(insights[0]["metric"], "2.0x spread");
    assert_eq!(insights[1]["type"], "Supplier Overdependence");
    assert_eq!(insights[1]["supplier"], "Acme");
    assert_eq!(insights[1]["metric"], "90% of total spend");
    assert_eq!(insights[1]["impact"], "High");
    assert_eq!(insights[2]["type"], "Missed Volume Discount");
    assert_eq!(insights[2]["metric"], "10500 units purchased");
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let app = setup_test_app();

    let response = app
        .oneshot(upload_request("attachment", &sample_sheet().to_csv()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "No file provided");
}

#[tokio::test]
async fn test_upload_empty_sheet_is_bad_request() {
    let app = setup_test_app();

    let response = app.oneshot(upload_request("file", "")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_schema_violations() {
    let app = setup_test_app();

    // Core columns only: the year-over-year columns are missing
    let csv = "Item Number,Supplier Name,CY WAP USD (Fiscal),CY Quantity (Fiscal),CY WAP * CY QTY\n\
               A100,Acme,ten,5,50\n";

    let response = app.oneshot(upload_request("file", csv)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("failed validation"));

    let violations = json["violations"].as_array().unwrap();
    let columns: Vec<&str> = violations
        .iter()
        .map(|v| v["column"].as_str().unwrap())
        .collect();
    assert_eq!(
        columns,
        vec![
            "CY WAP USD (Fiscal)",
            "Item Name",
            "CY vs PY WAP USD (Fiscal)"
        ]
    );
    assert_eq!(violations[0]["kind"], "incompatible");
    assert_eq!(violations[0]["row"], 1);
    assert_eq!(violations[0]["value"], "ten");
    assert_eq!(violations[1]["kind"], "missing");
}

#[tokio::test]
async fn test_upload_over_size_limit() {
    let app = create_router(ServerConfig {
        max_upload_size: 64,
        ..Default::default()
    });

    let response = app
        .oneshot(upload_request("file", &sample_sheet().to_csv()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("File too large"));
}

#[tokio::test]
async fn test_upload_without_findings() {
    let app = setup_test_app();

    let csv = SheetBuilder::new()
        .row("Acme", "A100", 10.0, 5.0, 0.5)
        .row("Globex", "B200", 10.0, 5.0, -0.5)
        .row("Initech", "C300", 10.0, 5.0, 0.0)
        .to_csv();

    let response = app.oneshot(upload_request("file", &csv)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert!(json["dynamic_insights"].as_array().unwrap().is_empty());
    assert_eq!(json["top_suppliers"].as_array().unwrap().len(), 3);
}

// ========== Middleware Tests ==========

#[tokio::test]
async fn test_security_headers() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert!(headers.contains_key("content-security-policy"));
}

#[tokio::test]
async fn test_cors_wildcard_allows_any_origin() {
    let app = create_router(ServerConfig {
        allowed_origins: vec!["*".to_string()],
        ..Default::default()
    });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("origin", "https://dashboard.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_cors_listed_origin() {
    let app = create_router(ServerConfig {
        allowed_origins: vec!["http://localhost:5173".to_string()],
        ..Default::default()
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("origin", "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("origin", "https://elsewhere.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(!response
        .headers()
        .contains_key("access-control-allow-origin"));
}

// ========== Error Mapping Tests ==========

#[test]
fn test_core_error_status_mapping() {
    use spendscope_core::Error;

    assert_eq!(
        AppError::from_core(Error::DegenerateInput("zero total".into())).status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(
        AppError::from_core(Error::Import("no header".into())).status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        AppError::from_core(Error::DuplicateRule("Unit Price Variance".into())).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn test_analyze_upload_directly() {
    let state = AppState::new(ServerConfig::default());
    let csv = sample_sheet().to_csv();

    let report = handlers::analyze_upload(&state, csv.as_bytes()).unwrap();
    assert_eq!(report.top_suppliers[0].supplier, "Acme");
    assert_eq!(report.dynamic_insights.len(), 3);
}
