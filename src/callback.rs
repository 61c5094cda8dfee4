// Simulated status callbacks: logged after a delay, never sent

use serde::Serialize;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::utils::time::{format_iso, now};

#[derive(Debug, Clone, Serialize)]
pub struct CallbackAccount {
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CallbackWorkflowExecution {
    pub id: String,
    pub status: String,
}

/// Body a real provider would POST to the account's callback URL
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackPayload {
    pub timestamp: String,
    pub account: CallbackAccount,
    pub workflow_execution: CallbackWorkflowExecution,
}

impl CallbackPayload {
    pub fn new(
        timestamp: String,
        account_id: &str,
        workflow_execution_id: &str,
        status: &str,
    ) -> Self {
        Self {
            timestamp,
            account: CallbackAccount {
                id: account_id.to_string(),
            },
            workflow_execution: CallbackWorkflowExecution {
                id: workflow_execution_id.to_string(),
                status: status.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct CallbackDispatcher {
    delay: Duration,
}

impl CallbackDispatcher {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Fire-and-forget: the request does not wait for the returned task.
    /// The payload is stamped when the delay elapses.
    pub fn schedule(
        &self,
        url: String,
        account_id: String,
        workflow_execution_id: String,
        status: String,
    ) -> JoinHandle<()> {
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let payload = CallbackPayload::new(
                format_iso(&now()),
                &account_id,
                &workflow_execution_id,
                &status,
            );
            match serde_json::to_string(&payload) {
                Ok(body) => info!(
                    callback_url = %url,
                    payload = %body,
                    workflow_execution_id = %payload.workflow_execution.id,
                    "Callback would be sent"
                ),
                Err(e) => warn!(
                    error = %e,
                    callback_url = %url,
                    "Failed to serialize callback payload"
                ),
            }
        })
    }
}
