// Stored records and request/response bodies

use serde::{Deserialize, Serialize};

/// Stored workflow status before submission
pub const PENDING_STATUS: &str = "PENDING";

/// Account row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccountRecord {
    pub id: String,
    pub customer_internal_reference: Option<String>,
    pub user_reference: Option<String>,
    pub workflow_definition_key: Option<String>,
    pub callback_url: Option<String>,
    pub success_url: Option<String>,
    pub error_url: Option<String>,
    pub created_at: String,
}

/// Workflow execution row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WorkflowExecutionRecord {
    pub id: String,
    pub account_id: String,
    pub status: String,
    pub user_reference: Option<String>,
    pub created_at: String,
    pub completed_at: Option<String>,
}

/// A workflow execution joined with its owning account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowContext {
    pub execution: WorkflowExecutionRecord,
    pub account: AccountRecord,
}

impl WorkflowContext {
    /// Reference used to classify the outcome (the owning account's)
    pub fn email(&self) -> Option<&str> {
        self.account.user_reference.as_deref()
    }
}

/// Fields changed by `PUT /api/v1/accounts/{id}` when a definition is supplied
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountUpdate {
    pub workflow_definition_key: Option<String>,
    pub callback_url: Option<String>,
    pub success_url: Option<String>,
    pub error_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkflowDefinitionRef {
    pub key: Option<serde_json::Value>,
}

impl WorkflowDefinitionRef {
    /// Definition keys arrive as strings or numbers
    pub fn key_string(&self) -> Option<String> {
        match self.key.as_ref()? {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Body of account create/update requests
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequest {
    pub customer_internal_reference: Option<String>,
    pub user_reference: Option<String>,
    pub workflow_definition: Option<WorkflowDefinitionRef>,
    pub callback_url: Option<String>,
    pub success_url: Option<String>,
    pub error_url: Option<String>,
}

impl AccountRequest {
    pub fn definition_key(&self) -> Option<String> {
        self.workflow_definition.as_ref().and_then(WorkflowDefinitionRef::key_string)
    }
}

/// Body of `POST /oauth2/token`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenRequest {
    pub grant_type: Option<String>,
}

/// Body of `POST /workflow/{id}/submit`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmitWorkflowRequest {
    #[serde(default)]
    pub uploads: Option<serde_json::Value>,
}
