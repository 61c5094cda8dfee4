// Email-pattern classification of mock verification outcomes

use serde::Serialize;
use std::fmt;

/// Fabricated verification decision derived from a user reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationOutcome {
    Approved,
    Rejected,
    ManualReview,
}

impl VerificationOutcome {
    /// Label stored on the workflow execution and sent in callbacks
    pub fn status_label(&self) -> &'static str {
        match self {
            VerificationOutcome::Approved => "APPROVED_VERIFIED",
            VerificationOutcome::Rejected => "REJECTED_UNSUPPORTED_ID_TYPE",
            VerificationOutcome::ManualReview => "REQUIRES_MANUAL_REVIEW",
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, VerificationOutcome::Approved)
    }
}

impl fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VerificationOutcome::Approved => "APPROVED",
            VerificationOutcome::Rejected => "REJECTED",
            VerificationOutcome::ManualReview => "MANUAL_REVIEW",
        };
        f.write_str(name)
    }
}

const REJECT_MARKERS: [&str; 2] = ["rejected", "failed"];
const REVIEW_MARKERS: [&str; 2] = ["review", "manual"];

/// Classify an email into an outcome.
///
/// Case-insensitive substring match; rejection markers are checked before
/// review markers. Absent or unmatched emails are approved.
pub fn classify(email: Option<&str>) -> VerificationOutcome {
    let Some(email) = email else {
        return VerificationOutcome::Approved;
    };

    let lower = email.to_lowercase();
    if REJECT_MARKERS.iter().any(|marker| lower.contains(marker)) {
        VerificationOutcome::Rejected
    } else if REVIEW_MARKERS.iter().any(|marker| lower.contains(marker)) {
        VerificationOutcome::ManualReview
    } else {
        VerificationOutcome::Approved
    }
}
