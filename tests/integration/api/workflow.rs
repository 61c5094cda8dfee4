// Hosted verification page and submission

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;

use crate::common::{
    authorized_get, authorized_json, create_account, create_test_app, get, ids, obtain_token,
    send, send_text,
};

fn submit_request(workflow_execution_id: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/workflow/{}/submit", workflow_execution_id))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "uploads": { "front": "data:image/png;base64,AAAA" } }).to_string(),
        ))
        .unwrap()
}

#[tokio::test]
async fn test_workflow_page_renders() {
    let app = create_test_app();
    let token = obtain_token(&app).await;
    let (_, workflow_execution_id) = ids(&create_account(&app, &token, "approved@test.com").await);

    let page = format!("/workflow/{}", workflow_execution_id);
    let (status, html) = send_text(&app, get(&page)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(&workflow_execution_id));
    assert!(!html.contains("{{WORKFLOW_EXECUTION_ID}}"));
}

#[tokio::test]
async fn test_workflow_page_unknown_id() {
    let app = create_test_app();
    let (status, html) = send_text(&app, get("/workflow/wfe_missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Workflow not found"));
}

#[tokio::test]
async fn test_submit_approved() {
    let app = create_test_app();
    let token = obtain_token(&app).await;
    let (account_id, workflow_execution_id) =
        ids(&create_account(&app, &token, "approved@test.com").await);

    let (status, body) = send(&app, submit_request(&workflow_execution_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["verificationStatus"], "APPROVED_VERIFIED");
    assert_eq!(body["successUrl"], "http://localhost:3000/success");
    assert_eq!(body["errorUrl"], "http://localhost:3000/error");

    let details_uri = format!("/api/v1/accounts/{}", account_id);
    let (_, details) = send(&app, authorized_get(&details_uri, &token)).await;
    assert_eq!(details["workflowExecutions"][0]["status"], "APPROVED_VERIFIED");
    assert!(details["workflowExecutions"][0]["completedAt"].is_string());
}

#[tokio::test]
async fn test_submit_rejected_uses_account_urls() {
    let app = create_test_app();
    let token = obtain_token(&app).await;

    let request_body = json!({
        "userReference": "rejected@test.com",
        "workflowDefinition": { "key": 10164 },
        "successUrl": "https://client.example/ok",
        "errorUrl": "https://client.example/fail"
    });
    let (status, created) =
        send(&app, authorized_json("POST", "/api/v1/accounts", &token, &request_body)).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, workflow_execution_id) = ids(&created);

    let (status, body) = send(&app, submit_request(&workflow_execution_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert_eq!(body["verificationStatus"], "REJECTED_UNSUPPORTED_ID_TYPE");
    assert_eq!(body["successUrl"], "https://client.example/ok");
    assert_eq!(body["errorUrl"], "https://client.example/fail");
}

#[tokio::test]
async fn test_submit_manual_review_without_body() {
    let app = create_test_app();
    let token = obtain_token(&app).await;
    let (_, workflow_execution_id) = ids(&create_account(&app, &token, "manual@test.com").await);

    let request = Request::builder()
        .method("POST")
        .uri(format!("/workflow/{}/submit", workflow_execution_id))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert_eq!(body["verificationStatus"], "REQUIRES_MANUAL_REVIEW");
}

#[tokio::test]
async fn test_submit_unknown_workflow() {
    let app = create_test_app();
    let (status, body) = send(&app, submit_request("wfe_missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Workflow not found");
}

#[tokio::test]
async fn test_static_result_pages() {
    let app = create_test_app();
    let (status, html) = send_text(&app, get("/success")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Verification Successful"));

    let (status, html) = send_text(&app, get("/error")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Verification Failed"));
}
