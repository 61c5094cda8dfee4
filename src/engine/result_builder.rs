// Mock verification result synthesis

use chrono::{DateTime, Utc};
use rand::RngCore;
use std::sync::Arc;

use crate::engine::classifier::VerificationOutcome;
use crate::engine::document::{
    AccountRef, Address, Capabilities, CapabilityCheck, CheckDecision, Decision, DecisionDetails,
    DecisionLabel, DecisionType, DocumentData, Extraction, ExtractionData, RejectReason,
    RejectReasonDetail, VerificationResultDocument, WorkflowDefinition, WorkflowExecutionSummary,
    WorkflowLifecycleStatus,
};

pub const REJECT_REASON_CODE: &str = "UNSUPPORTED_ID_TYPE";
const REJECT_REASON_DESCRIPTION: &str = "The provided document type is not supported";
const REJECT_DETAILS_CODE: &str = "DOCUMENT_NOT_SUPPORTED";
const REJECT_DETAILS_DESCRIPTION: &str = "Document verification failed";

/// Source of fabricated document numbers
pub trait DocumentNumberSource: Send + Sync {
    fn next_document_number(&self) -> String;
}

/// 16 uppercase hex characters from the thread-local CSPRNG
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomDocumentNumber;

impl DocumentNumberSource for RandomDocumentNumber {
    fn next_document_number(&self) -> String {
        let mut bytes = [0u8; 8];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode_upper(bytes)
    }
}

/// Always yields the same number; for replayable output
#[derive(Debug, Clone)]
pub struct FixedDocumentNumber(pub String);

impl DocumentNumberSource for FixedDocumentNumber {
    fn next_document_number(&self) -> String {
        self.0.clone()
    }
}

/// Builds terminal (PROCESSED) verification documents
#[derive(Clone)]
pub struct MockResultBuilder {
    document_numbers: Arc<dyn DocumentNumberSource>,
}

impl Default for MockResultBuilder {
    fn default() -> Self {
        Self::new(Arc::new(RandomDocumentNumber))
    }
}

impl MockResultBuilder {
    pub fn new(document_numbers: Arc<dyn DocumentNumberSource>) -> Self {
        Self { document_numbers }
    }

    /// Build the full result document for `outcome`.
    ///
    /// `capabilities` is attached for approved and manual-review outcomes,
    /// `rejectReason` for rejected ones; never both.
    pub fn build_result(
        &self,
        outcome: VerificationOutcome,
        account_id: &str,
        workflow_execution_id: &str,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> VerificationResultDocument {
        let (capabilities, reject_reason) = match outcome {
            VerificationOutcome::Rejected => (None, Some(reject_reason())),
            VerificationOutcome::Approved | VerificationOutcome::ManualReview => {
                (Some(self.capabilities(outcome)), None)
            }
        };

        VerificationResultDocument {
            timestamp: now,
            account: AccountRef {
                id: account_id.to_string(),
            },
            workflow_execution: WorkflowExecutionSummary {
                id: workflow_execution_id.to_string(),
                status: WorkflowLifecycleStatus::Processed,
                definition: WorkflowDefinition::default(),
                started_at,
                completed_at: Some(completed_at),
            },
            decision: Some(decision(outcome)),
            capabilities,
            reject_reason,
        }
    }

    fn capabilities(&self, outcome: VerificationOutcome) -> Capabilities {
        let document = self.document_data();
        let approved = outcome.is_approved();

        let check = |approved_decision: CheckDecision, approved_score: f64, review_score: f64| {
            if approved {
                CapabilityCheck {
                    decision: approved_decision,
                    score: approved_score,
                }
            } else {
                CapabilityCheck {
                    decision: CheckDecision::Review,
                    score: review_score,
                }
            }
        };

        Capabilities {
            extraction: Extraction {
                data: ExtractionData {
                    us_address: document.address.clone(),
                    document,
                },
            },
            similarity: check(CheckDecision::Match, 0.95, 0.75),
            liveness: check(CheckDecision::Passed, 0.98, 0.72),
            authentication: check(CheckDecision::Authentic, 0.92, 0.68),
            image_quality: CapabilityCheck {
                decision: CheckDecision::Passed,
                score: 0.88,
            },
        }
    }

    fn document_data(&self) -> DocumentData {
        DocumentData {
            kind: "DRIVING_LICENSE".to_string(),
            country: "USA".to_string(),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            date_of_birth: "1990-01-15".to_string(),
            expiry_date: "2028-12-31".to_string(),
            issuing_date: "2023-01-15".to_string(),
            document_number: self.document_numbers.next_document_number(),
            address: Address {
                line1: "123 Main Street".to_string(),
                city: "San Francisco".to_string(),
                subdivision: "CA".to_string(),
                postal_code: "94102".to_string(),
                country: "USA".to_string(),
            },
        }
    }
}

fn decision(outcome: VerificationOutcome) -> Decision {
    let (kind, label) = match outcome {
        VerificationOutcome::Approved => (DecisionType::Accepted, DecisionLabel::Ok),
        VerificationOutcome::Rejected => (DecisionType::Rejected, DecisionLabel::Rejected),
        VerificationOutcome::ManualReview => (DecisionType::Review, DecisionLabel::ManualReview),
    };
    Decision {
        kind,
        details: DecisionDetails { label },
    }
}

fn reject_reason() -> RejectReason {
    RejectReason {
        reject_reason_code: REJECT_REASON_CODE.to_string(),
        reject_reason_description: REJECT_REASON_DESCRIPTION.to_string(),
        reject_reason_details: vec![RejectReasonDetail {
            details_code: REJECT_DETAILS_CODE.to_string(),
            details_description: REJECT_DETAILS_DESCRIPTION.to_string(),
        }],
    }
}
