// In-memory account and workflow execution store

use crate::api::AccountStore;
use crate::core::errors::MockServerError;
use crate::core::models::{AccountRecord, AccountUpdate, WorkflowContext, WorkflowExecutionRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct StoreState {
    accounts: HashMap<String, AccountRecord>,
    // Insertion sequence breaks ties between executions created in the same millisecond
    executions: HashMap<String, (u64, WorkflowExecutionRecord)>,
    next_seq: u64,
}

/// Process-local store; contents are lost on restart
#[derive(Default)]
pub struct InMemoryAccountStore {
    state: RwLock<StoreState>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn join(state: &StoreState, execution: &WorkflowExecutionRecord) -> Option<WorkflowContext> {
    state
        .accounts
        .get(&execution.account_id)
        .map(|account| WorkflowContext {
            execution: execution.clone(),
            account: account.clone(),
        })
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn create_account(&self, account: &AccountRecord) -> Result<(), MockServerError> {
        let mut state = self.state.write().await;
        if state.accounts.contains_key(&account.id) {
            return Err(MockServerError::StoreError(format!(
                "Account {} already exists",
                account.id
            )));
        }
        state.accounts.insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn find_account(
        &self,
        account_id: &str,
    ) -> Result<Option<AccountRecord>, MockServerError> {
        Ok(self.state.read().await.accounts.get(account_id).cloned())
    }

    async fn update_account(
        &self,
        account_id: &str,
        update: &AccountUpdate,
    ) -> Result<(), MockServerError> {
        let mut state = self.state.write().await;
        let account = state
            .accounts
            .get_mut(account_id)
            .ok_or_else(|| MockServerError::NotFound("Account".to_string()))?;
        account.workflow_definition_key = update.workflow_definition_key.clone();
        account.callback_url = update.callback_url.clone();
        account.success_url = update.success_url.clone();
        account.error_url = update.error_url.clone();
        Ok(())
    }

    async fn create_workflow_execution(
        &self,
        execution: &WorkflowExecutionRecord,
    ) -> Result<(), MockServerError> {
        let mut state = self.state.write().await;
        if !state.accounts.contains_key(&execution.account_id) {
            return Err(MockServerError::StoreError(format!(
                "Account {} does not exist",
                execution.account_id
            )));
        }
        if state.executions.contains_key(&execution.id) {
            return Err(MockServerError::StoreError(format!(
                "Workflow execution {} already exists",
                execution.id
            )));
        }
        let seq = state.next_seq;
        state.next_seq += 1;
        state
            .executions
            .insert(execution.id.clone(), (seq, execution.clone()));
        Ok(())
    }

    async fn find_workflow(
        &self,
        workflow_execution_id: &str,
    ) -> Result<Option<WorkflowContext>, MockServerError> {
        let state = self.state.read().await;
        Ok(state
            .executions
            .get(workflow_execution_id)
            .and_then(|(_, execution)| join(&state, execution)))
    }

    async fn find_workflow_for_account(
        &self,
        account_id: &str,
        workflow_execution_id: &str,
    ) -> Result<Option<WorkflowContext>, MockServerError> {
        let state = self.state.read().await;
        Ok(state
            .executions
            .get(workflow_execution_id)
            .filter(|(_, execution)| execution.account_id == account_id)
            .and_then(|(_, execution)| join(&state, execution)))
    }

    async fn list_workflow_executions(
        &self,
        account_id: &str,
    ) -> Result<Vec<WorkflowExecutionRecord>, MockServerError> {
        let state = self.state.read().await;
        let mut executions: Vec<&(u64, WorkflowExecutionRecord)> = state
            .executions
            .values()
            .filter(|(_, execution)| execution.account_id == account_id)
            .collect();
        executions.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at.cmp(&a.created_at).then(seq_b.cmp(seq_a))
        });
        Ok(executions.into_iter().map(|(_, execution)| execution.clone()).collect())
    }

    async fn complete_workflow(
        &self,
        workflow_execution_id: &str,
        status: &str,
        completed_at: &str,
    ) -> Result<bool, MockServerError> {
        let mut state = self.state.write().await;
        match state.executions.get_mut(workflow_execution_id) {
            Some((_, execution)) => {
                execution.status = status.to_string();
                execution.completed_at = Some(completed_at.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), MockServerError> {
        Ok(())
    }
}
