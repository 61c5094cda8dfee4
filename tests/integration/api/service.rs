// Service descriptor, health, metrics and fallback

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

use crate::common::{create_account, create_test_app, get, obtain_token, send, send_text};

#[tokio::test]
async fn test_service_info() {
    let app = create_test_app();
    let (status, body) = send(&app, get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["endpoints"]["oauth2"], "/oauth2/token");
    assert!(body["mockInfo"]["emailPatterns"].is_object());
}

#[tokio::test]
async fn test_health() {
    let app = create_test_app();
    let (status, body) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "memory");
    assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn test_metrics_count_activity() {
    let app = create_test_app();
    let token = obtain_token(&app).await;
    create_account(&app, &token, "approved@test.com").await;

    let (status, text) = send_text(&app, get("/metrics")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("kyc_mock_tokens_issued_total 1"));
    assert!(text.contains("kyc_mock_accounts_created_total 1"));
    assert!(text.contains("kyc_mock_workflow_executions_created_total 1"));
}

#[tokio::test]
async fn test_auth_failures_counted() {
    let app = create_test_app();
    let (status, _) = send(&app, get("/api/v1/accounts/acc_x")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, text) = send_text(&app, get("/metrics")).await;
    assert!(text.contains(r#"kyc_mock_auth_failures_total{reason="unauthorized"} 1"#));
}

#[tokio::test]
async fn test_unknown_route() {
    let app = create_test_app();
    let (status, body) = send(&app, get("/no/such/route")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Route not found");
}

#[tokio::test]
async fn test_cors_headers_on_traced_responses() {
    let app = create_test_app();
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, "https://client.example")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let allow_origin = response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN);
    assert_eq!(allow_origin.unwrap(), "*");
}
