// Request handlers for API endpoints

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Path, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Json, Response},
    Extension, Form,
};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::api::responses::{
    AccountDetailsResponse, AccountResponse, ApiError, HealthResponse, RouteNotFound, SubmitError,
    SubmitResponse, TokenResponse,
};
use crate::api::AppState;
use crate::core::crypto::TokenClaims;
use crate::core::errors::MockServerError;
use crate::core::ids::{generate_account_id, generate_workflow_execution_id};
use crate::core::models::{
    AccountRecord, AccountRequest, AccountUpdate, SubmitWorkflowRequest, TokenRequest,
    WorkflowExecutionRecord, PENDING_STATUS,
};
use crate::engine::{classify, WorkflowSnapshot, WorkflowTimestamps};
use crate::utils::time::{format_iso, now};

const CLIENT_CREDENTIALS: &str = "client_credentials";

/// Service descriptor
///
/// GET /
pub async fn service_info_handler() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Mock KYC Server - Identity Verification API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "oauth2": "/oauth2/token",
            "accounts": "/api/v1/accounts",
            "retrieval": "/api/v1/accounts/:accountId/workflow-executions/:workflowExecutionId",
            "webInterface": "/workflow/:workflowExecutionId",
            "health": "/health",
            "metrics": "/metrics"
        },
        "mockInfo": {
            "emailPatterns": {
                "approved@* or success@*": "APPROVED_VERIFIED",
                "rejected@* or failed@*": "REJECTED_UNSUPPORTED_ID_TYPE",
                "review@* or manual@*": "REQUIRES_MANUAL_REVIEW",
                "other": "APPROVED_VERIFIED (default)"
            }
        }
    }))
}

/// Health check handler
///
/// GET /health
///
/// Answers 503 with status `degraded` when the store does not respond.
pub async fn health_handler(State(app_state): State<AppState>) -> Response {
    let store = app_state.config.store_kind();
    let check = tokio::time::timeout(Duration::from_millis(500), app_state.store.ping()).await;

    let (status_code, status) = match check {
        Ok(Ok(())) => (StatusCode::OK, "healthy"),
        Ok(Err(e)) => {
            warn!(error = %e, store = %store, "Store ping failed");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded")
        }
        Err(_) => {
            warn!(store = %store, "Store ping timed out");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded")
        }
    };

    let body = HealthResponse {
        success: status_code == StatusCode::OK,
        status: status.to_string(),
        store: store.to_string(),
        timestamp: format_iso(&now()),
    };
    (status_code, Json(body)).into_response()
}

/// Prometheus metrics
///
/// GET /metrics
pub async fn metrics_handler(State(app_state): State<AppState>) -> Result<Response, ApiError> {
    let body = app_state.metrics.render().map_err(|e| {
        error!(error = %e, "Failed to encode metrics");
        MockServerError::from(e)
    })?;
    Ok(([(CONTENT_TYPE, "text/plain; version=0.0.4")], body).into_response())
}

/// OAuth2 client-credentials token endpoint (Basic auth applied by middleware)
///
/// POST /oauth2/token
///
/// Accepts a form-encoded or JSON body.
pub async fn token_handler(
    State(app_state): State<AppState>,
    request: Request,
) -> Result<Json<TokenResponse>, ApiError> {
    let token_request = read_token_request(request).await;
    let grant_type = token_request.grant_type.unwrap_or_default();

    if grant_type != CLIENT_CREDENTIALS {
        warn!(grant_type = %grant_type, "Unsupported grant type");
        return Err(MockServerError::UnsupportedGrantType(grant_type).into());
    }

    let ttl = app_state.config.oauth_token_ttl_secs;
    let access_token = app_state.token_issuer.issue_oauth2_token(ttl).map_err(|e| {
        error!(error = %e, "Failed to issue access token");
        e
    })?;

    app_state.metrics.tokens_issued.inc();
    info!(expires_in = ttl, "Issued OAuth2 access token");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer",
        expires_in: ttl,
    }))
}

/// Unreadable bodies count as a missing grant type
async fn read_token_request(request: Request) -> TokenRequest {
    let is_json = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/json"))
        .unwrap_or(false);

    if is_json {
        Json::<TokenRequest>::from_request(request, &())
            .await
            .map(|Json(body)| body)
            .unwrap_or_default()
    } else {
        Form::<TokenRequest>::from_request(request, &())
            .await
            .map(|Form(body)| body)
            .unwrap_or_default()
    }
}

/// Create account and its first workflow execution
///
/// POST /api/v1/accounts
pub async fn create_account_handler(
    State(app_state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
    body: Result<Json<AccountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    let Json(request) = body.map_err(invalid_body)?;
    debug!(token_type = ?claims.kind, "Create account request");

    let definition_key = request.definition_key().ok_or_else(|| {
        MockServerError::InvalidRequest("workflowDefinition.key is required".to_string())
    })?;

    let created = now();
    let created_at = format_iso(&created);
    let account = AccountRecord {
        id: generate_account_id(),
        customer_internal_reference: request.customer_internal_reference.clone(),
        user_reference: request.user_reference.clone(),
        workflow_definition_key: Some(definition_key),
        callback_url: request.callback_url.clone(),
        success_url: request.success_url.clone(),
        error_url: request.error_url.clone(),
        created_at: created_at.clone(),
    };

    app_state.store.create_account(&account).await.map_err(|e| {
        error!(error = %e, "Failed to store account");
        e
    })?;
    app_state.metrics.accounts_created.inc();

    let execution = start_workflow_execution(
        &app_state,
        &account.id,
        request.user_reference.clone(),
        created_at,
    )
    .await?;

    info!(
        account_id = %account.id,
        workflow_execution_id = %execution.id,
        "Account created"
    );

    let response = account_response(
        &app_state,
        &account.id,
        &execution.id,
        request.success_url.as_deref(),
        request.error_url.as_deref(),
    )?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Update account and start a new workflow execution
///
/// PUT /api/v1/accounts/{accountId}
///
/// The definition key and URLs are overwritten only when the body carries a
/// `workflowDefinition`.
pub async fn update_account_handler(
    State(app_state): State<AppState>,
    Path(account_id): Path<String>,
    body: Result<Json<AccountRequest>, JsonRejection>,
) -> Result<Json<AccountResponse>, ApiError> {
    let Json(request) = body.map_err(invalid_body)?;

    let account = app_state
        .store
        .find_account(&account_id)
        .await?
        .ok_or_else(|| MockServerError::NotFound("Account".to_string()))?;

    // Links must match what the submit redirect will read from the stored account
    let (success_url, error_url) = if request.workflow_definition.is_some() {
        let update = AccountUpdate {
            workflow_definition_key: request.definition_key(),
            callback_url: request.callback_url.clone(),
            success_url: request.success_url.clone(),
            error_url: request.error_url.clone(),
        };
        app_state.store.update_account(&account_id, &update).await?;
        debug!(account_id = %account_id, "Account definition updated");
        (request.success_url.clone(), request.error_url.clone())
    } else {
        (account.success_url, account.error_url)
    };

    let execution = start_workflow_execution(
        &app_state,
        &account_id,
        request.user_reference.clone(),
        format_iso(&now()),
    )
    .await?;

    info!(
        account_id = %account_id,
        workflow_execution_id = %execution.id,
        "Workflow execution started for existing account"
    );

    let response = account_response(
        &app_state,
        &account_id,
        &execution.id,
        success_url.as_deref(),
        error_url.as_deref(),
    )?;
    Ok(Json(response))
}

/// Account details with its workflow executions, newest first
///
/// GET /api/v1/accounts/{accountId}
pub async fn get_account_handler(
    State(app_state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<AccountDetailsResponse>, ApiError> {
    let account = app_state
        .store
        .find_account(&account_id)
        .await?
        .ok_or_else(|| MockServerError::NotFound("Account".to_string()))?;

    let executions = app_state.store.list_workflow_executions(&account_id).await?;
    Ok(Json(AccountDetailsResponse::new(account, executions)))
}

/// Progressive verification result
///
/// GET /api/v1/accounts/{accountId}/workflow-executions/{workflowExecutionId}
pub async fn workflow_result_handler(
    State(app_state): State<AppState>,
    Path((account_id, workflow_execution_id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let context = app_state
        .store
        .find_workflow_for_account(&account_id, &workflow_execution_id)
        .await?
        .ok_or_else(|| MockServerError::NotFound("Workflow execution".to_string()))?;

    let timestamps = WorkflowTimestamps::parse(
        &context.execution.created_at,
        context.execution.completed_at.as_deref(),
    )
    .map_err(|e| {
        error!(
            error = %e,
            workflow_execution_id = %workflow_execution_id,
            "Stored workflow timestamp is unreadable"
        );
        e
    })?;

    let snapshot = WorkflowSnapshot {
        account_id: &context.account.id,
        workflow_execution_id: &context.execution.id,
        email: context.email(),
        timestamps,
    };
    let document = app_state.engine.compute_status(&snapshot, now());
    let status = document.workflow_execution.status;

    app_state
        .metrics
        .results_served
        .with_label_values(&[status.as_str()])
        .inc();
    debug!(
        workflow_execution_id = %workflow_execution_id,
        status = status.as_str(),
        "Served verification result"
    );

    Ok(Json(document).into_response())
}

/// Hosted-page submission: records the outcome and schedules the callback log
///
/// POST /workflow/{workflowExecutionId}/submit
pub async fn submit_workflow_handler(
    State(app_state): State<AppState>,
    Path(workflow_execution_id): Path<String>,
    body: Option<Json<SubmitWorkflowRequest>>,
) -> Result<Response, ApiError> {
    let context = match app_state.store.find_workflow(&workflow_execution_id).await? {
        Some(context) => context,
        None => {
            return Ok(SubmitError {
                status: "error",
                message: "Workflow not found".to_string(),
            }
            .with_status(StatusCode::NOT_FOUND));
        }
    };

    let uploads = body.and_then(|Json(request)| request.uploads);
    debug!(
        workflow_execution_id = %workflow_execution_id,
        has_uploads = uploads.is_some(),
        "Workflow submission received"
    );

    let outcome = classify(context.email());
    let verification_status = outcome.status_label();
    let completed_at = format_iso(&now());

    app_state
        .store
        .complete_workflow(&workflow_execution_id, verification_status, &completed_at)
        .await?;
    app_state
        .metrics
        .workflows_submitted
        .with_label_values(&[&outcome.to_string()])
        .inc();

    if let Some(callback_url) = context.account.callback_url.clone() {
        app_state.callbacks.schedule(
            callback_url,
            context.account.id.clone(),
            workflow_execution_id.clone(),
            verification_status.to_string(),
        );
    }

    info!(
        workflow_execution_id = %workflow_execution_id,
        outcome = %outcome,
        "Workflow submitted"
    );

    let base_url = &app_state.config.base_url;
    let response = SubmitResponse {
        status: if outcome.is_approved() { "success" } else { "error" },
        verification_status,
        success_url: context
            .account
            .success_url
            .unwrap_or_else(|| format!("{}/success", base_url)),
        error_url: context
            .account
            .error_url
            .unwrap_or_else(|| format!("{}/error", base_url)),
    };
    Ok(Json(response).into_response())
}

/// Fallback for unknown routes
pub async fn not_found_handler() -> (StatusCode, Json<RouteNotFound>) {
    (StatusCode::NOT_FOUND, Json(RouteNotFound::default()))
}

async fn start_workflow_execution(
    app_state: &AppState,
    account_id: &str,
    user_reference: Option<String>,
    created_at: String,
) -> Result<WorkflowExecutionRecord, MockServerError> {
    let execution = WorkflowExecutionRecord {
        id: generate_workflow_execution_id(),
        account_id: account_id.to_string(),
        status: PENDING_STATUS.to_string(),
        user_reference,
        created_at,
        completed_at: None,
    };

    app_state.store.create_workflow_execution(&execution).await.map_err(|e| {
        error!(error = %e, account_id = %account_id, "Failed to store workflow execution");
        e
    })?;
    app_state.metrics.workflow_executions_created.inc();
    Ok(execution)
}

fn account_response(
    app_state: &AppState,
    account_id: &str,
    workflow_execution_id: &str,
    success_url: Option<&str>,
    error_url: Option<&str>,
) -> Result<AccountResponse, MockServerError> {
    let sdk_token = app_state.token_issuer.issue_sdk_token(
        account_id,
        workflow_execution_id,
        app_state.config.sdk_token_ttl_secs,
    )?;
    // Credential API tokens share the access-token lifetime, not SDK_TOKEN_EXPIRY
    let api_token = app_state
        .token_issuer
        .issue_api_token(workflow_execution_id, app_state.config.oauth_token_ttl_secs)?;

    Ok(AccountResponse::build(
        &app_state.config.base_url,
        format_iso(&now()),
        account_id,
        workflow_execution_id,
        sdk_token,
        api_token,
        success_url,
        error_url,
    ))
}

fn invalid_body(rejection: JsonRejection) -> ApiError {
    debug!(error = %rejection, "Rejected request body");
    MockServerError::InvalidRequest(format!("Invalid JSON body: {}", rejection.body_text())).into()
}
