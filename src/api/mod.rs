// Axum web server layer

use axum::{
    error_handling::HandleErrorLayer,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
    BoxError, Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub mod handlers;
pub mod pages;
pub mod responses;

use crate::auth::audit_logger::AuditLogger;
use crate::auth::auth_middleware::{basic_auth_middleware, bearer_auth_middleware, AuthState};
use crate::callback::CallbackDispatcher;
use crate::core::crypto::TokenIssuer;
use crate::core::errors::MockServerError;
use crate::core::models::{AccountRecord, AccountUpdate, WorkflowContext, WorkflowExecutionRecord};
use crate::engine::{MockResultBuilder, ProgressiveResultEngine};
use crate::metrics::ServerMetrics;
use responses::ErrorResponse;

pub use crate::config::Config;

/// Keyed record store for accounts and their workflow executions
#[async_trait::async_trait]
pub trait AccountStore: Send + Sync {
    async fn create_account(&self, account: &AccountRecord) -> Result<(), MockServerError>;
    async fn find_account(
        &self,
        account_id: &str,
    ) -> Result<Option<AccountRecord>, MockServerError>;
    /// Overwrite the definition key and URLs; `NotFound` if the account is unknown
    async fn update_account(
        &self,
        account_id: &str,
        update: &AccountUpdate,
    ) -> Result<(), MockServerError>;
    async fn create_workflow_execution(
        &self,
        execution: &WorkflowExecutionRecord,
    ) -> Result<(), MockServerError>;
    /// Execution joined with its owning account
    async fn find_workflow(
        &self,
        workflow_execution_id: &str,
    ) -> Result<Option<WorkflowContext>, MockServerError>;
    /// Like `find_workflow`, but only if the execution belongs to `account_id`
    async fn find_workflow_for_account(
        &self,
        account_id: &str,
        workflow_execution_id: &str,
    ) -> Result<Option<WorkflowContext>, MockServerError>;
    /// Newest first
    async fn list_workflow_executions(
        &self,
        account_id: &str,
    ) -> Result<Vec<WorkflowExecutionRecord>, MockServerError>;
    /// Record the submitted outcome; `false` if the execution is unknown
    async fn complete_workflow(
        &self,
        workflow_execution_id: &str,
        status: &str,
        completed_at: &str,
    ) -> Result<bool, MockServerError>;
    async fn ping(&self) -> Result<(), MockServerError>;
}

/// Application state containing all shared dependencies
///
/// All components are wrapped in Arc for shared ownership across async tasks.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AccountStore + Send + Sync>,
    pub token_issuer: Arc<TokenIssuer>,
    pub engine: Arc<ProgressiveResultEngine>,
    pub callbacks: CallbackDispatcher,
    pub metrics: Arc<ServerMetrics>,
    pub audit_logger: Arc<AuditLogger>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire the shared components from configuration and a chosen store
    pub fn new(
        config: Config,
        store: Arc<dyn AccountStore + Send + Sync>,
        builder: MockResultBuilder,
    ) -> Result<Self, MockServerError> {
        let metrics = Arc::new(ServerMetrics::new()?);
        let token_issuer = Arc::new(TokenIssuer::new(&config.jwt_secret, &config.base_url));
        let engine = Arc::new(ProgressiveResultEngine::new(config.callback_delay_ms, builder));

        Ok(Self {
            store,
            token_issuer,
            engine,
            callbacks: CallbackDispatcher::new(config.callback_delay_ms),
            audit_logger: Arc::new(AuditLogger::new(metrics.clone())),
            metrics,
            config: Arc::new(config),
        })
    }

    fn auth_state(&self) -> Arc<AuthState> {
        Arc::new(AuthState {
            token_issuer: self.token_issuer.clone(),
            audit_logger: self.audit_logger.clone(),
            config: self.config.clone(),
        })
    }
}

/// Create the Axum router with all routes and middleware
///
/// Middleware stack (outermost to innermost):
/// - Tracing (tower-http::trace)
/// - CORS (permissive)
/// - Request timeout (tower::timeout), answered with 408
/// - Body size limit (tower-http::limit)
/// - Basic auth on `/oauth2/token`, Bearer auth on `/api/v1/*` (route layers)
pub fn create_router(app_state: AppState) -> Router {
    let auth_state = app_state.auth_state();

    let oauth = Router::new()
        .route("/oauth2/token", post(handlers::token_handler))
        .route_layer(from_fn_with_state(auth_state.clone(), basic_auth_middleware));

    let api = Router::new()
        .route("/api/v1/accounts", post(handlers::create_account_handler))
        .route(
            "/api/v1/accounts/:account_id",
            get(handlers::get_account_handler).put(handlers::update_account_handler),
        )
        .route(
            "/api/v1/accounts/:account_id/workflow-executions/:workflow_execution_id",
            get(handlers::workflow_result_handler),
        )
        .route_layer(from_fn_with_state(auth_state, bearer_auth_middleware));

    let public = Router::new()
        .route("/", get(handlers::service_info_handler))
        .route("/health", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .route("/workflow/:workflow_execution_id", get(pages::workflow_page))
        .route("/workflow/:workflow_execution_id/submit", post(handlers::submit_workflow_handler))
        .route("/success", get(pages::success_page))
        .route("/error", get(pages::error_page));

    let body_limit = app_state.config.body_size_limit_bytes;
    let timeout_secs = app_state.config.request_timeout_secs;

    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(HandleErrorLayer::new(|e: BoxError| async move {
            let (status, error) = if e.is::<tower::timeout::error::Elapsed>() {
                (StatusCode::REQUEST_TIMEOUT, "request_timeout")
            } else {
                (StatusCode::INTERNAL_SERVER_ERROR, "server_error")
            };
            let body = ErrorResponse {
                error: error.to_string(),
                error_description: None,
                message: Some(e.to_string()),
                request_id: None,
            };
            (status, Json(body))
        }))
        .timeout(Duration::from_secs(timeout_secs))
        .layer(RequestBodyLimitLayer::new(body_limit));

    public
        .merge(oauth)
        .merge(api)
        .fallback(handlers::not_found_handler)
        .layer(middleware_stack)
        .with_state(app_state)
}
