// Common test utilities and helpers for all test modules
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use kyc_mock_server::api::{create_router, AccountStore, AppState, Config};
use kyc_mock_server::core::models::{AccountRecord, WorkflowExecutionRecord, PENDING_STATUS};
use kyc_mock_server::engine::{FixedDocumentNumber, MockResultBuilder};
use kyc_mock_server::state::memory_store::InMemoryAccountStore;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_DOCUMENT_NUMBER: &str = "TESTDOC000000001";
pub const CLIENT_ID: &str = "your-client-id";
pub const CLIENT_SECRET: &str = "your-client-secret";

pub fn fixed_builder() -> MockResultBuilder {
    MockResultBuilder::new(Arc::new(FixedDocumentNumber(TEST_DOCUMENT_NUMBER.to_string())))
}

/// Test configuration with a custom lifecycle delay
pub fn test_config_with_delay(delay_ms: u64) -> Config {
    let mut config = Config::test_config();
    config.callback_delay_ms = delay_ms;
    config
}

/// App state over the given store
pub fn create_test_app_state_with(
    config: Config,
    store: Arc<dyn AccountStore + Send + Sync>,
) -> AppState {
    AppState::new(config, store, fixed_builder()).unwrap()
}

/// App state over a fresh in-memory store with the default 2s delay
pub fn create_test_app_state() -> AppState {
    create_test_app_state_with(Config::test_config(), Arc::new(InMemoryAccountStore::new()))
}

pub fn create_test_app() -> Router {
    create_router(create_test_app_state())
}

pub fn basic_auth_header(client_id: &str, client_secret: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", client_id, client_secret)))
}

/// Send a request and decode the body as JSON (Null when empty or not JSON)
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Send a request and return the raw body text
pub async fn send_text(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn authorized_get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn authorized_json(method: &str, uri: &str, token: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn token_request(authorization: Option<&str>, form_body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/oauth2/token")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::from(form_body.to_string())).unwrap()
}

/// Obtain an OAuth2 access token with the default mock credentials
pub async fn obtain_token(app: &Router) -> String {
    let auth = basic_auth_header(CLIENT_ID, CLIENT_SECRET);
    let (status, body) =
        send(app, token_request(Some(&auth), "grant_type=client_credentials")).await;
    assert_eq!(status, StatusCode::OK, "token request failed: {}", body);
    body["access_token"].as_str().unwrap().to_string()
}

/// Create an account for `email` and return the account response
pub async fn create_account(app: &Router, token: &str, email: &str) -> Value {
    let request_body = serde_json::json!({
        "customerInternalReference": "test-customer",
        "userReference": email,
        "workflowDefinition": { "key": 10164 },
        "callbackUrl": "https://example.com/callback"
    });
    let (status, body) =
        send(app, authorized_json("POST", "/api/v1/accounts", token, &request_body)).await;
    assert_eq!(status, StatusCode::CREATED, "account creation failed: {}", body);
    body
}

pub fn ids(account_response: &Value) -> (String, String) {
    (
        account_response["account"]["id"].as_str().unwrap().to_string(),
        account_response["workflowExecution"]["id"].as_str().unwrap().to_string(),
    )
}

/// Seed an account plus one pending workflow execution created at `created_at`
pub async fn seed_workflow(
    store: &dyn AccountStore,
    account_id: &str,
    workflow_execution_id: &str,
    email: Option<&str>,
    created_at: &str,
) {
    store
        .create_account(&AccountRecord {
            id: account_id.to_string(),
            customer_internal_reference: None,
            user_reference: email.map(str::to_string),
            workflow_definition_key: Some("10164".to_string()),
            callback_url: None,
            success_url: None,
            error_url: None,
            created_at: created_at.to_string(),
        })
        .await
        .unwrap();
    store
        .create_workflow_execution(&WorkflowExecutionRecord {
            id: workflow_execution_id.to_string(),
            account_id: account_id.to_string(),
            status: PENDING_STATUS.to_string(),
            user_reference: email.map(str::to_string),
            created_at: created_at.to_string(),
            completed_at: None,
        })
        .await
        .unwrap();
}
