// Full HTTP flow against the SQLite store

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use kyc_mock_server::api::{create_router, AccountStore};
use kyc_mock_server::infra::sqlite_store::SqliteAccountStore;
use std::sync::Arc;
use tempfile::TempDir;

use crate::common::{
    authorized_get, create_account, create_test_app_state_with, get, ids, obtain_token, send,
    test_config_with_delay,
};

#[tokio::test]
async fn test_account_lifecycle_on_sqlite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("kyc.db");
    let store = Arc::new(SqliteAccountStore::connect(&path).await.unwrap());

    let mut config = test_config_with_delay(60_000);
    config.database_path = Some(path.clone());
    let app = create_router(create_test_app_state_with(config, store.clone()));

    let token = obtain_token(&app).await;
    let (account_id, workflow_execution_id) =
        ids(&create_account(&app, &token, "review@test.com").await);

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"], "sqlite");

    let submit = Request::builder()
        .method("POST")
        .uri(format!("/workflow/{}/submit", workflow_execution_id))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, submit).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["verificationStatus"], "REQUIRES_MANUAL_REVIEW");

    let uri = format!(
        "/api/v1/accounts/{}/workflow-executions/{}",
        account_id, workflow_execution_id
    );
    let (status, body) = send(&app, authorized_get(&uri, &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["workflowExecution"]["status"], "PROCESSED");
    assert_eq!(body["decision"]["type"], "REVIEW");

    let context = store.find_workflow(&workflow_execution_id).await.unwrap().unwrap();
    assert_eq!(context.account.id, account_id);
    assert_eq!(context.execution.status, "REQUIRES_MANUAL_REVIEW");
    assert!(context.execution.completed_at.is_some());
}

#[tokio::test]
async fn test_records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("kyc.db");

    let account_id = {
        let store = Arc::new(SqliteAccountStore::connect(&path).await.unwrap());
        let app = create_router(create_test_app_state_with(test_config_with_delay(2000), store));
        let token = obtain_token(&app).await;
        ids(&create_account(&app, &token, "approved@test.com").await).0
    };

    let reopened = SqliteAccountStore::connect(&path).await.unwrap();
    let account = reopened.find_account(&account_id).await.unwrap().unwrap();
    assert_eq!(account.user_reference.as_deref(), Some("approved@test.com"));
    assert_eq!(reopened.list_workflow_executions(&account_id).await.unwrap().len(), 1);
}
