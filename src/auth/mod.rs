// Authentication: Basic client credentials and Bearer JWTs

pub mod audit_logger;
pub mod auth_middleware;
pub mod client_credentials;
