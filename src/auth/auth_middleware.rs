// Axum authentication middleware

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::api::responses::ApiError;
use crate::auth::audit_logger::{AuditLogger, AuthEvent};
use crate::auth::client_credentials::ClientCredentials;
use crate::config::Config;
use crate::core::crypto::TokenIssuer;
use crate::core::errors::MockServerError;

/// Authentication state containing all dependencies
pub struct AuthState {
    pub token_issuer: Arc<TokenIssuer>,
    pub audit_logger: Arc<AuditLogger>,
    /// Source of the expected client id and secret
    pub config: Arc<Config>,
}

/// Basic authentication for `POST /oauth2/token`
pub async fn basic_auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = authorization_header(request.headers()).unwrap_or_default();

    let credentials = match ClientCredentials::from_header(&header) {
        Ok(credentials) => credentials,
        Err(e) => {
            record_failure(&auth_state, &request, "basic", None, &e);
            return Err(e.into());
        }
    };

    if !credentials.matches(&auth_state.config.client_id, &auth_state.config.client_secret) {
        let e = MockServerError::InvalidClient;
        record_failure(&auth_state, &request, "basic", Some(credentials.client_id()), &e);
        return Err(e.into());
    }

    auth_state.audit_logger.log_auth_event(
        AuthEvent::AuthSuccess,
        "basic",
        Some(credentials.client_id()),
        extract_ip_address(&request).as_deref(),
        extract_user_agent(&request).as_deref(),
    );

    Ok(next.run(request).await)
}

/// Bearer token authentication for `/api/v1/*`
///
/// Verified claims are placed in request extensions for handlers to use.
pub async fn bearer_auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = match extract_bearer_token(request.headers()) {
        Some(token) => token,
        None => {
            let e = MockServerError::MissingBearerToken;
            record_failure(&auth_state, &request, "bearer", None, &e);
            return Err(e.into());
        }
    };

    let claims = match auth_state.token_issuer.verify(&token) {
        Ok(claims) => claims,
        Err(e) => {
            record_failure(&auth_state, &request, "bearer", None, &e);
            return Err(e.into());
        }
    };

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

fn record_failure(
    auth_state: &AuthState,
    request: &Request,
    scheme: &str,
    principal: Option<&str>,
    error: &MockServerError,
) {
    auth_state.audit_logger.log_auth_event(
        AuthEvent::AuthFailure {
            reason: error.error_code(),
        },
        scheme,
        principal,
        extract_ip_address(request).as_deref(),
        extract_user_agent(request).as_deref(),
    );
}

fn authorization_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

/// Extract the token from `Authorization: Bearer <token>`
fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    authorization_header(headers)?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Extract IP address from request headers
///
/// Checks `X-Forwarded-For` first (for proxied requests), then `X-Real-IP`.
fn extract_ip_address(request: &Request) -> Option<String> {
    request.headers()
        .get("X-Forwarded-For")
        .or_else(|| request.headers().get("X-Real-IP"))
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

fn extract_user_agent(request: &Request) -> Option<String> {
    request.headers()
        .get("User-Agent")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}
