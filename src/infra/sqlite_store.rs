// SQLite-backed account and workflow execution store

use crate::api::AccountStore;
use crate::core::errors::MockServerError;
use crate::core::models::{AccountRecord, AccountUpdate, WorkflowContext, WorkflowExecutionRecord};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::path::Path;
use tracing::info;

const SCHEMA: [&str; 2] = [
    "CREATE TABLE IF NOT EXISTS accounts (
        id TEXT PRIMARY KEY,
        customer_internal_reference TEXT,
        user_reference TEXT,
        workflow_definition_key TEXT,
        callback_url TEXT,
        success_url TEXT,
        error_url TEXT,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS workflow_executions (
        id TEXT PRIMARY KEY,
        account_id TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'PENDING',
        user_reference TEXT,
        created_at TEXT NOT NULL,
        completed_at TEXT,
        FOREIGN KEY (account_id) REFERENCES accounts(id) ON DELETE CASCADE
    )",
];

const WORKFLOW_JOIN: &str = "SELECT
        we.id AS we_id, we.account_id AS we_account_id, we.status AS we_status,
        we.user_reference AS we_user_reference, we.created_at AS we_created_at,
        we.completed_at AS we_completed_at,
        a.id, a.customer_internal_reference, a.user_reference, a.workflow_definition_key,
        a.callback_url, a.success_url, a.error_url, a.created_at
     FROM workflow_executions we
     JOIN accounts a ON we.account_id = a.id";

/// Row produced by `WORKFLOW_JOIN`
#[derive(FromRow)]
struct WorkflowJoinRow {
    we_id: String,
    we_account_id: String,
    we_status: String,
    we_user_reference: Option<String>,
    we_created_at: String,
    we_completed_at: Option<String>,
    #[sqlx(flatten)]
    account: AccountRecord,
}

impl From<WorkflowJoinRow> for WorkflowContext {
    fn from(row: WorkflowJoinRow) -> Self {
        WorkflowContext {
            execution: WorkflowExecutionRecord {
                id: row.we_id,
                account_id: row.we_account_id,
                status: row.we_status,
                user_reference: row.we_user_reference,
                created_at: row.we_created_at,
                completed_at: row.we_completed_at,
            },
            account: row.account,
        }
    }
}

/// Database-backed store
pub struct SqliteAccountStore {
    pool: SqlitePool,
}

impl SqliteAccountStore {
    /// Open (creating if missing) the database file and ensure the schema exists
    pub async fn connect(path: &Path) -> Result<Self, MockServerError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.initialize_schema().await?;
        info!(path = ?path, "SQLite store ready");
        Ok(store)
    }

    /// Private in-memory database; a single connection keeps every query on the same database
    pub async fn in_memory() -> Result<Self, MockServerError> {
        let options = SqliteConnectOptions::new()
            .in_memory(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.initialize_schema().await?;
        Ok(store)
    }

    async fn initialize_schema(&self) -> Result<(), MockServerError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    async fn create_account(&self, account: &AccountRecord) -> Result<(), MockServerError> {
        sqlx::query(
            "INSERT INTO accounts (id, customer_internal_reference, user_reference,
                                   workflow_definition_key,
                                   callback_url, success_url, error_url, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&account.id)
        .bind(&account.customer_internal_reference)
        .bind(&account.user_reference)
        .bind(&account.workflow_definition_key)
        .bind(&account.callback_url)
        .bind(&account.success_url)
        .bind(&account.error_url)
        .bind(&account.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_account(
        &self,
        account_id: &str,
    ) -> Result<Option<AccountRecord>, MockServerError> {
        let account = sqlx::query_as::<_, AccountRecord>("SELECT * FROM accounts WHERE id = ?")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn update_account(
        &self,
        account_id: &str,
        update: &AccountUpdate,
    ) -> Result<(), MockServerError> {
        let result = sqlx::query(
            "UPDATE accounts
             SET workflow_definition_key = ?, callback_url = ?, success_url = ?, error_url = ?
             WHERE id = ?",
        )
        .bind(&update.workflow_definition_key)
        .bind(&update.callback_url)
        .bind(&update.success_url)
        .bind(&update.error_url)
        .bind(account_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(MockServerError::NotFound("Account".to_string()));
        }
        Ok(())
    }

    async fn create_workflow_execution(
        &self,
        execution: &WorkflowExecutionRecord,
    ) -> Result<(), MockServerError> {
        sqlx::query(
            "INSERT INTO workflow_executions
                 (id, account_id, status, user_reference, created_at, completed_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&execution.id)
        .bind(&execution.account_id)
        .bind(&execution.status)
        .bind(&execution.user_reference)
        .bind(&execution.created_at)
        .bind(&execution.completed_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_workflow(
        &self,
        workflow_execution_id: &str,
    ) -> Result<Option<WorkflowContext>, MockServerError> {
        let row =
            sqlx::query_as::<_, WorkflowJoinRow>(&format!("{} WHERE we.id = ?", WORKFLOW_JOIN))
                .bind(workflow_execution_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(WorkflowContext::from))
    }

    async fn find_workflow_for_account(
        &self,
        account_id: &str,
        workflow_execution_id: &str,
    ) -> Result<Option<WorkflowContext>, MockServerError> {
        let row = sqlx::query_as::<_, WorkflowJoinRow>(&format!(
            "{} WHERE we.id = ? AND a.id = ?",
            WORKFLOW_JOIN
        ))
        .bind(workflow_execution_id)
        .bind(account_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(WorkflowContext::from))
    }

    async fn list_workflow_executions(
        &self,
        account_id: &str,
    ) -> Result<Vec<WorkflowExecutionRecord>, MockServerError> {
        let rows = sqlx::query_as::<_, WorkflowExecutionRecord>(
            "SELECT id, account_id, status, user_reference, created_at, completed_at
             FROM workflow_executions
             WHERE account_id = ?
             ORDER BY created_at DESC, rowid DESC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn complete_workflow(
        &self,
        workflow_execution_id: &str,
        status: &str,
        completed_at: &str,
    ) -> Result<bool, MockServerError> {
        let result = sqlx::query(
            "UPDATE workflow_executions SET status = ?, completed_at = ? WHERE id = ?",
        )
        .bind(status)
        .bind(completed_at)
        .bind(workflow_execution_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), MockServerError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
