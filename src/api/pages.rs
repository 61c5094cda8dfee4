// Hosted verification pages

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
};
use tracing::error;

use crate::api::AppState;

const WORKFLOW_TEMPLATE: &str = include_str!("../../templates/workflow.html");
const SUCCESS_PAGE: &str = include_str!("../../templates/success.html");
const ERROR_PAGE: &str = include_str!("../../templates/error.html");

const WORKFLOW_ID_PLACEHOLDER: &str = "{{WORKFLOW_EXECUTION_ID}}";

/// GET /workflow/{workflowExecutionId}
pub async fn workflow_page(
    State(app_state): State<AppState>,
    Path(workflow_execution_id): Path<String>,
) -> (StatusCode, Html<String>) {
    match app_state.store.find_workflow(&workflow_execution_id).await {
        Ok(Some(context)) => (
            StatusCode::OK,
            Html(render_workflow_page(&context.execution.id)),
        ),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Html("<h1>Workflow not found</h1>".to_string()),
        ),
        Err(e) => {
            error!(
                error = %e,
                workflow_execution_id = %workflow_execution_id,
                "Failed to load workflow page"
            );
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<h1>Error loading verification page</h1>".to_string()),
            )
        }
    }
}

/// The id comes from the store, never from the request path
fn render_workflow_page(workflow_execution_id: &str) -> String {
    WORKFLOW_TEMPLATE.replace(WORKFLOW_ID_PLACEHOLDER, workflow_execution_id)
}

/// GET /success
pub async fn success_page() -> Html<&'static str> {
    Html(SUCCESS_PAGE)
}

/// GET /error
pub async fn error_page() -> Html<&'static str> {
    Html(ERROR_PAGE)
}
