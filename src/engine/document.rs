// Verification result document returned by the retrieval endpoint

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::utils::time::{serialize_iso, serialize_iso_opt};

pub const WORKFLOW_DEFINITION_KEY: &str = "10164";
pub const WORKFLOW_DEFINITION_NAME: &str = "ID + Selfie Verification";

/// Lifecycle stage reported to a polling caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowLifecycleStatus {
    Initiated,
    Processing,
    Processed,
}

impl WorkflowLifecycleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowLifecycleStatus::Initiated => "INITIATED",
            WorkflowLifecycleStatus::Processing => "PROCESSING",
            WorkflowLifecycleStatus::Processed => "PROCESSED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResultDocument {
    #[serde(serialize_with = "serialize_iso")]
    pub timestamp: DateTime<Utc>,
    pub account: AccountRef,
    pub workflow_execution: WorkflowExecutionSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Capabilities>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reject_reason: Option<RejectReason>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExecutionSummary {
    pub id: String,
    pub status: WorkflowLifecycleStatus,
    pub definition: WorkflowDefinition,
    #[serde(serialize_with = "serialize_iso")]
    pub started_at: DateTime<Utc>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_iso_opt"
    )]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowDefinition {
    pub key: String,
    pub name: String,
}

impl Default for WorkflowDefinition {
    fn default() -> Self {
        Self {
            key: WORKFLOW_DEFINITION_KEY.to_string(),
            name: WORKFLOW_DEFINITION_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionType {
    Accepted,
    Rejected,
    Review,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionLabel {
    Ok,
    Rejected,
    ManualReview,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    #[serde(rename = "type")]
    pub kind: DecisionType,
    pub details: DecisionDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionDetails {
    pub label: DecisionLabel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckDecision {
    Match,
    Passed,
    Authentic,
    Review,
}

/// One capability sub-check with its confidence score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapabilityCheck {
    pub decision: CheckDecision,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub extraction: Extraction,
    pub similarity: CapabilityCheck,
    pub liveness: CapabilityCheck,
    pub authentication: CapabilityCheck,
    pub image_quality: CapabilityCheck,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extraction {
    pub data: ExtractionData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionData {
    pub document: DocumentData,
    pub us_address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentData {
    #[serde(rename = "type")]
    pub kind: String,
    pub country: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub expiry_date: String,
    pub issuing_date: String,
    pub document_number: String,
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub line1: String,
    pub city: String,
    pub subdivision: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectReason {
    pub reject_reason_code: String,
    pub reject_reason_description: String,
    pub reject_reason_details: Vec<RejectReasonDetail>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectReasonDetail {
    pub details_code: String,
    pub details_description: String,
}
