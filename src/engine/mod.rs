//! Mock verification engine.
//!
//! Classifies a user reference into an outcome, fabricates the matching
//! result document, and derives the lifecycle stage a polling caller sees
//! from elapsed time.

pub mod classifier;
pub mod document;
pub mod progressive;
pub mod result_builder;

pub use classifier::{classify, VerificationOutcome};
pub use document::{VerificationResultDocument, WorkflowLifecycleStatus};
pub use progressive::{
    lifecycle_status, ProgressiveResultEngine, WorkflowSnapshot, WorkflowTimestamps,
};
pub use result_builder::{
    DocumentNumberSource, FixedDocumentNumber, MockResultBuilder, RandomDocumentNumber,
};
