// OAuth2 client-credentials endpoint

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};

use crate::common::{
    authorized_get, basic_auth_header, create_test_app, obtain_token, send, token_request,
    CLIENT_ID, CLIENT_SECRET,
};

#[tokio::test]
async fn test_token_issued_for_valid_client() {
    let app = create_test_app();
    let auth = basic_auth_header(CLIENT_ID, CLIENT_SECRET);

    let (status, body) =
        send(&app, token_request(Some(&auth), "grant_type=client_credentials")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 3600);
    assert!(body["access_token"].as_str().unwrap().split('.').count() == 3);
}

#[tokio::test]
async fn test_token_accepts_json_body() {
    let app = create_test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/oauth2/token")
        .header(header::AUTHORIZATION, basic_auth_header(CLIENT_ID, CLIENT_SECRET))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"grant_type":"client_credentials"}"#))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].is_string());
}

#[tokio::test]
async fn test_missing_basic_auth() {
    let app = create_test_app();
    let (status, body) = send(&app, token_request(None, "grant_type=client_credentials")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
    assert_eq!(body["error_description"], "Basic authentication required");
}

#[tokio::test]
async fn test_wrong_client_secret() {
    let app = create_test_app();
    let auth = basic_auth_header(CLIENT_ID, "not-the-secret");
    let (status, body) =
        send(&app, token_request(Some(&auth), "grant_type=client_credentials")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_client");
}

#[tokio::test]
async fn test_malformed_basic_auth() {
    let app = create_test_app();
    let request = token_request(Some("Basic !!!not-base64"), "grant_type=client_credentials");
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_request");
}

#[tokio::test]
async fn test_unsupported_grant_type() {
    let app = create_test_app();
    let auth = basic_auth_header(CLIENT_ID, CLIENT_SECRET);

    let (status, body) = send(&app, token_request(Some(&auth), "grant_type=password")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unsupported_grant_type");

    let (status, _) = send(&app, token_request(Some(&auth), "")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_issued_token_opens_api() {
    let app = create_test_app();
    let token = obtain_token(&app).await;

    let (status, body) = send(&app, authorized_get("/api/v1/accounts/acc_missing", &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}
