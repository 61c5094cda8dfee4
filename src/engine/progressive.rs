// Time-derived workflow lifecycle

use chrono::{DateTime, Utc};

use crate::core::errors::MockServerError;
use crate::engine::classifier::classify;
use crate::engine::document::{
    AccountRef, VerificationResultDocument, WorkflowDefinition, WorkflowExecutionSummary,
    WorkflowLifecycleStatus,
};
use crate::engine::result_builder::MockResultBuilder;
use crate::utils::time::parse_iso;

pub const DEFAULT_DELAY_MS: u64 = 2000;

/// Creation and completion instants of a workflow execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowTimestamps {
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl WorkflowTimestamps {
    /// Parse the stored text form. Unparsable values fail with `InvalidTimestamp`.
    pub fn parse(created_at: &str, completed_at: Option<&str>) -> Result<Self, MockServerError> {
        Ok(Self {
            created_at: parse_iso(created_at)?,
            completed_at: completed_at.map(parse_iso).transpose()?,
        })
    }
}

/// Everything the engine reads about one workflow execution
#[derive(Debug, Clone, Copy)]
pub struct WorkflowSnapshot<'a> {
    pub account_id: &'a str,
    pub workflow_execution_id: &'a str,
    pub email: Option<&'a str>,
    pub timestamps: WorkflowTimestamps,
}

/// Map elapsed time to a lifecycle stage.
///
/// Windows are half-open: `[0, delay/2)` INITIATED, `[delay/2, delay)`
/// PROCESSING, `[delay, ∞)` PROCESSED. A completion marker forces PROCESSED.
pub fn lifecycle_status(
    timestamps: &WorkflowTimestamps,
    delay_ms: u64,
    now: DateTime<Utc>,
) -> WorkflowLifecycleStatus {
    if timestamps.completed_at.is_some() {
        return WorkflowLifecycleStatus::Processed;
    }

    let elapsed_ms = i128::from((now - timestamps.created_at).num_milliseconds());
    let delay_ms = i128::from(delay_ms);

    if elapsed_ms * 2 < delay_ms {
        WorkflowLifecycleStatus::Initiated
    } else if elapsed_ms < delay_ms {
        WorkflowLifecycleStatus::Processing
    } else {
        WorkflowLifecycleStatus::Processed
    }
}

/// Reports progressive results for workflows that have not been submitted yet
#[derive(Clone)]
pub struct ProgressiveResultEngine {
    delay_ms: u64,
    builder: MockResultBuilder,
}

impl ProgressiveResultEngine {
    pub fn new(delay_ms: u64, builder: MockResultBuilder) -> Self {
        Self { delay_ms, builder }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// Compute the document a caller polling at `now` should see.
    ///
    /// Never mutates anything: a synthetic PROCESSED result stamps `completedAt`
    /// with `now` without recording it.
    pub fn compute_status(
        &self,
        snapshot: &WorkflowSnapshot<'_>,
        now: DateTime<Utc>,
    ) -> VerificationResultDocument {
        let timestamps = &snapshot.timestamps;
        match lifecycle_status(timestamps, self.delay_ms, now) {
            WorkflowLifecycleStatus::Processed => self.builder.build_result(
                classify(snapshot.email),
                snapshot.account_id,
                snapshot.workflow_execution_id,
                timestamps.created_at,
                timestamps.completed_at.unwrap_or(now),
                now,
            ),
            status => VerificationResultDocument {
                timestamp: now,
                account: AccountRef {
                    id: snapshot.account_id.to_string(),
                },
                workflow_execution: WorkflowExecutionSummary {
                    id: snapshot.workflow_execution_id.to_string(),
                    status,
                    definition: WorkflowDefinition::default(),
                    started_at: timestamps.created_at,
                    completed_at: None,
                },
                decision: None,
                capabilities: None,
                reject_reason: None,
            },
        }
    }
}
