// Domain error types - secure error handling with no information disclosure

use thiserror::Error;

/// Main error type for the mock server
#[derive(Error, Debug)]
pub enum MockServerError {
    /// No `Authorization: Basic` header on the token endpoint (HTTP 401)
    #[error("Basic authentication required")]
    MissingBasicAuth,

    /// Client id/secret pair did not match (HTTP 401)
    #[error("Invalid client credentials")]
    InvalidClient,

    /// Authorization header present but undecodable (HTTP 401)
    #[error("Malformed authorization header")]
    MalformedAuthorization,

    /// No `Authorization: Bearer` header on an API route (HTTP 401)
    #[error("Bearer token required")]
    MissingBearerToken,

    /// Bearer token failed signature or expiry checks (HTTP 401)
    #[error("Invalid or expired token: {0}")]
    InvalidToken(String),

    /// OAuth2 grant other than client_credentials (HTTP 400)
    #[error("Unsupported grant type: {0}")]
    UnsupportedGrantType(String),

    /// Request body failed validation (HTTP 400)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Account or workflow execution does not exist (HTTP 404)
    #[error("{0} not found")]
    NotFound(String),

    /// Stored timestamp could not be parsed (HTTP 500)
    #[error("Invalid stored timestamp '{0}'")]
    InvalidTimestamp(String),

    /// Token signing failed (HTTP 500)
    #[error("Token error: {0}")]
    TokenError(String),

    /// Record store failure (HTTP 500)
    #[error("Store error: {0}")]
    StoreError(String),

    /// Configuration error (HTTP 500)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Metrics registration or encoding failed (HTTP 500)
    #[error("Metrics error: {0}")]
    MetricsError(String),
}

impl MockServerError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            MockServerError::MissingBasicAuth
            | MockServerError::InvalidClient
            | MockServerError::MalformedAuthorization
            | MockServerError::MissingBearerToken
            | MockServerError::InvalidToken(_) => 401,
            MockServerError::UnsupportedGrantType(_) | MockServerError::InvalidRequest(_) => 400,
            MockServerError::NotFound(_) => 404,
            MockServerError::InvalidTimestamp(_)
            | MockServerError::TokenError(_)
            | MockServerError::StoreError(_)
            | MockServerError::ConfigurationError(_)
            | MockServerError::MetricsError(_) => 500,
        }
    }

    /// Machine-readable error code placed in the `error` field of responses
    pub fn error_code(&self) -> &'static str {
        match self {
            MockServerError::MissingBasicAuth | MockServerError::MissingBearerToken => {
                "unauthorized"
            }
            MockServerError::InvalidClient => "invalid_client",
            MockServerError::MalformedAuthorization => "invalid_request",
            MockServerError::InvalidToken(_) => "invalid_token",
            MockServerError::UnsupportedGrantType(_) => "unsupported_grant_type",
            MockServerError::InvalidRequest(_) => "invalid_request",
            MockServerError::NotFound(_) => "not_found",
            MockServerError::InvalidTimestamp(_)
            | MockServerError::TokenError(_)
            | MockServerError::StoreError(_)
            | MockServerError::ConfigurationError(_)
            | MockServerError::MetricsError(_) => "server_error",
        }
    }

    /// Get user-friendly error message (no sensitive information)
    pub fn user_message(&self) -> String {
        match self {
            MockServerError::MissingBasicAuth => "Basic authentication required".to_string(),
            MockServerError::InvalidClient => "Invalid client credentials".to_string(),
            MockServerError::MalformedAuthorization => "Malformed authorization header".to_string(),
            MockServerError::MissingBearerToken => "Bearer token required".to_string(),
            MockServerError::InvalidToken(_) => "Invalid or expired token".to_string(),
            MockServerError::UnsupportedGrantType(_) => {
                "Only client_credentials grant type is supported".to_string()
            }
            MockServerError::InvalidRequest(reason) => reason.clone(),
            MockServerError::NotFound(what) => format!("{} not found", what),
            MockServerError::InvalidTimestamp(_)
            | MockServerError::TokenError(_)
            | MockServerError::StoreError(_)
            | MockServerError::ConfigurationError(_)
            | MockServerError::MetricsError(_) => "Internal server error".to_string(),
        }
    }

    /// OAuth2 endpoint errors use `error_description` instead of `message`
    pub fn is_oauth(&self) -> bool {
        matches!(
            self,
            MockServerError::MissingBasicAuth
                | MockServerError::InvalidClient
                | MockServerError::MalformedAuthorization
                | MockServerError::UnsupportedGrantType(_)
        )
    }
}

impl From<sqlx::Error> for MockServerError {
    fn from(err: sqlx::Error) -> Self {
        MockServerError::StoreError(err.to_string())
    }
}

impl From<prometheus::Error> for MockServerError {
    fn from(err: prometheus::Error) -> Self {
        MockServerError::MetricsError(err.to_string())
    }
}
