//! Prometheus metrics for the mock server.
//!
//! [`ServerMetrics`] owns a dedicated [`Registry`] that `GET /metrics`
//! encodes into the Prometheus text exposition format.

use prometheus::{
    register_int_counter_vec_with_registry, register_int_counter_with_registry, Encoder,
    IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

pub struct ServerMetrics {
    registry: Registry,

    /// OAuth2 access tokens issued.
    pub tokens_issued: IntCounter,
    /// Accounts created via `POST /api/v1/accounts`.
    pub accounts_created: IntCounter,
    /// Workflow executions created (account create and update).
    pub workflow_executions_created: IntCounter,
    /// Result documents served, labelled by lifecycle status.
    pub results_served: IntCounterVec,
    /// Hosted-page submissions, labelled by verification outcome.
    pub workflows_submitted: IntCounterVec,
    /// Rejected Basic/Bearer authentication attempts, labelled by reason.
    pub auth_failures: IntCounterVec,
}

impl ServerMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let tokens_issued = register_int_counter_with_registry!(
            Opts::new("kyc_mock_tokens_issued_total", "OAuth2 access tokens issued"),
            registry
        )?;

        let accounts_created = register_int_counter_with_registry!(
            Opts::new("kyc_mock_accounts_created_total", "Accounts created"),
            registry
        )?;

        let workflow_executions_created = register_int_counter_with_registry!(
            Opts::new(
                "kyc_mock_workflow_executions_created_total",
                "Workflow executions created"
            ),
            registry
        )?;

        let results_served = register_int_counter_vec_with_registry!(
            Opts::new(
                "kyc_mock_results_served_total",
                "Verification result documents served"
            ),
            &["status"],
            registry
        )?;

        let workflows_submitted = register_int_counter_vec_with_registry!(
            Opts::new(
                "kyc_mock_workflows_submitted_total",
                "Hosted workflow submissions"
            ),
            &["outcome"],
            registry
        )?;

        let auth_failures = register_int_counter_vec_with_registry!(
            Opts::new(
                "kyc_mock_auth_failures_total",
                "Rejected authentication attempts"
            ),
            &["reason"],
            registry
        )?;

        Ok(Self {
            registry,
            tokens_issued,
            accounts_created,
            workflow_executions_created,
            results_served,
            workflows_submitted,
            auth_failures,
        })
    }

    /// Encode every registered metric in the text exposition format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
