// Security event logging

use crate::metrics::ServerMetrics;
use std::sync::Arc;
use tracing::{info, warn};

/// Authentication event type
#[derive(Debug, Clone)]
pub enum AuthEvent {
    AuthSuccess,
    AuthFailure { reason: &'static str },
}

/// Audit logger for security events
///
/// Emits a structured tracing event per attempt; failures also bump the
/// `auth_failures` counter labelled by reason.
pub struct AuditLogger {
    metrics: Arc<ServerMetrics>,
}

impl AuditLogger {
    pub fn new(metrics: Arc<ServerMetrics>) -> Self {
        Self { metrics }
    }

    /// Log an authentication event for `scheme` (`basic` or `bearer`)
    pub fn log_auth_event(
        &self,
        event: AuthEvent,
        scheme: &str,
        principal: Option<&str>,
        ip_address: Option<&str>,
        user_agent: Option<&str>,
    ) {
        match event {
            AuthEvent::AuthSuccess => {
                info!(
                    scheme = %scheme,
                    principal = ?principal,
                    ip_address = ?ip_address,
                    user_agent = ?user_agent,
                    "Authentication successful"
                );
            }
            AuthEvent::AuthFailure { reason } => {
                self.metrics.auth_failures.with_label_values(&[reason]).inc();
                warn!(
                    scheme = %scheme,
                    principal = ?principal,
                    ip_address = ?ip_address,
                    user_agent = ?user_agent,
                    reason = %reason,
                    "Authentication failed"
                );
            }
        }
    }
}
