// Response types for API endpoints

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::error;
use uuid::Uuid;

use crate::core::errors::MockServerError;
use crate::core::ids::generate_credential_id;
use crate::core::models::{AccountRecord, WorkflowExecutionRecord};

/// Error response structure
///
/// OAuth2 errors carry `error_description`; API errors carry `message`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// API error type that converts domain errors to HTTP responses
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    /// Create from MockServerError
    pub fn from_mock_error(err: MockServerError) -> Self {
        let status = StatusCode::from_u16(err.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let description = err.user_message();
        let (error_description, message) = if err.is_oauth() {
            (Some(description), None)
        } else {
            (None, Some(description))
        };
        Self {
            status,
            body: ErrorResponse {
                error: err.error_code().to_string(),
                error_description,
                message,
                request_id: None,
            },
        }
    }

    /// Create from MockServerError with request ID
    pub fn from_mock_error_with_id(err: MockServerError, request_id: String) -> Self {
        let mut api_error = Self::from_mock_error(err);
        api_error.body.request_id = Some(request_id);
        api_error
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Server-side failures get a request id so the logged cause can be found
impl From<MockServerError> for ApiError {
    fn from(err: MockServerError) -> Self {
        if err.status_code() >= 500 {
            let request_id = Uuid::new_v4().to_string();
            error!(request_id = %request_id, error = %err, "Request failed with server error");
            return ApiError::from_mock_error_with_id(err, request_id);
        }
        ApiError::from_mock_error(err)
    }
}

/// Body of `POST /oauth2/token`
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    pub store: String,
    pub timestamp: String,
}

/// Unknown-route body
#[derive(Debug, Serialize)]
pub struct RouteNotFound {
    pub success: bool,
    pub error: &'static str,
}

impl Default for RouteNotFound {
    fn default() -> Self {
        Self {
            success: false,
            error: "Route not found",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccountIdRef {
    pub id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebLinks {
    pub href: String,
    pub success_url: String,
    pub error_url: String,
}

#[derive(Debug, Serialize)]
pub struct SdkToken {
    pub token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialApi {
    pub token: String,
    pub workflow_execution: String,
    pub parts: serde_json::Map<String, Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id: String,
    pub category: &'static str,
    pub label: &'static str,
    pub allowed_channels: [&'static str; 3],
    pub api: CredentialApi,
}

#[derive(Debug, Serialize)]
pub struct AccountWorkflowExecution {
    pub id: String,
    pub credentials: Vec<Credential>,
}

/// Body returned by account create (201) and update (200)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub timestamp: String,
    pub account: AccountIdRef,
    pub web: WebLinks,
    pub sdk: SdkToken,
    pub workflow_execution: AccountWorkflowExecution,
}

const ALLOWED_CHANNELS: [&str; 3] = ["WEB", "API", "SDK"];

impl AccountResponse {
    /// Assemble the response for a freshly created workflow execution
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        base_url: &str,
        timestamp: String,
        account_id: &str,
        workflow_execution_id: &str,
        sdk_token: String,
        api_token: String,
        success_url: Option<&str>,
        error_url: Option<&str>,
    ) -> Self {
        let execution_url = format!(
            "{}/api/v1/workflow-executions/{}",
            base_url, workflow_execution_id
        );
        let part = |name: &str| Value::String(format!("{}/parts/{}", execution_url, name));

        let mut id_parts = serde_json::Map::new();
        id_parts.insert("front".to_string(), part("FRONT"));
        id_parts.insert("back".to_string(), part("BACK"));

        let mut selfie_parts = serde_json::Map::new();
        selfie_parts.insert("face".to_string(), part("FACE"));

        Self {
            timestamp,
            account: AccountIdRef {
                id: account_id.to_string(),
            },
            web: WebLinks {
                href: format!("{}/workflow/{}", base_url, workflow_execution_id),
                success_url: success_url
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{}/success", base_url)),
                error_url: error_url
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{}/error", base_url)),
            },
            sdk: SdkToken { token: sdk_token },
            workflow_execution: AccountWorkflowExecution {
                id: workflow_execution_id.to_string(),
                credentials: vec![
                    Credential {
                        id: generate_credential_id(),
                        category: "ID",
                        label: "Identity Document",
                        allowed_channels: ALLOWED_CHANNELS,
                        api: CredentialApi {
                            token: api_token.clone(),
                            workflow_execution: execution_url.clone(),
                            parts: id_parts,
                        },
                    },
                    Credential {
                        id: generate_credential_id(),
                        category: "SELFIE",
                        label: "Selfie",
                        allowed_channels: ALLOWED_CHANNELS,
                        api: CredentialApi {
                            token: api_token,
                            workflow_execution: execution_url,
                            parts: selfie_parts,
                        },
                    },
                ],
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExecutionSummary {
    pub id: String,
    pub status: String,
    pub created_at: String,
    pub completed_at: Option<String>,
}

impl From<WorkflowExecutionRecord> for WorkflowExecutionSummary {
    fn from(record: WorkflowExecutionRecord) -> Self {
        Self {
            id: record.id,
            status: record.status,
            created_at: record.created_at,
            completed_at: record.completed_at,
        }
    }
}

/// Body of `GET /api/v1/accounts/{accountId}`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDetailsResponse {
    pub id: String,
    pub customer_internal_reference: Option<String>,
    pub user_reference: Option<String>,
    pub workflow_definition_key: Option<String>,
    pub created_at: String,
    pub workflow_executions: Vec<WorkflowExecutionSummary>,
}

impl AccountDetailsResponse {
    pub fn new(account: AccountRecord, executions: Vec<WorkflowExecutionRecord>) -> Self {
        Self {
            id: account.id,
            customer_internal_reference: account.customer_internal_reference,
            user_reference: account.user_reference,
            workflow_definition_key: account.workflow_definition_key,
            created_at: account.created_at,
            workflow_executions: executions.into_iter().map(Into::into).collect(),
        }
    }
}

/// Body of `POST /workflow/{id}/submit`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub status: &'static str,
    pub verification_status: &'static str,
    pub success_url: String,
    pub error_url: String,
}

/// Submit-endpoint failure body; the hosted page reads `status`
#[derive(Debug, Serialize)]
pub struct SubmitError {
    pub status: &'static str,
    pub message: String,
}

impl SubmitError {
    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}
