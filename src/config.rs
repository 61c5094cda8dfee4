// Configuration management

use crate::core::errors::MockServerError;
use secrecy::Secret;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_JWT_SECRET: &str = "mock-kyc-secret-key-change-in-production";
pub const DEFAULT_CLIENT_ID: &str = "your-client-id";
pub const DEFAULT_CLIENT_SECRET: &str = "your-client-secret";

/// Application configuration loaded from environment variables
///
/// Secrets are held in `secrecy::Secret` and redacted from `Debug` output.
pub struct Config {
    // Server configuration
    pub bind_address: String,
    pub port: u16,
    /// Public base URL used in links and as the token issuer (no trailing slash)
    pub base_url: String,

    // Storage: unset means the in-memory store
    pub database_path: Option<PathBuf>,

    // Credentials
    pub jwt_secret: Secret<String>,
    pub client_id: String,
    pub client_secret: Secret<String>,

    // Workflow simulation
    pub callback_delay_ms: u64,
    pub oauth_token_ttl_secs: u64,
    pub sdk_token_ttl_secs: u64,

    // Middleware configuration
    pub request_timeout_secs: u64,
    pub body_size_limit_bytes: usize,

    // Logging configuration
    pub log_level: String,
    pub log_format: String, // "json" or "text"
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Supports `.env` file loading in development (via dotenv crate).
    pub fn from_env() -> Result<Self, MockServerError> {
        #[cfg(not(test))]
        {
            dotenv::dotenv().ok();
        }

        let config = Self {
            bind_address: Self::get_env_or_default("BIND_ADDRESS", "0.0.0.0"),
            port: Self::parse_or_default("PORT", 3000u16)?,
            base_url: Self::get_env_or_default("BASE_URL", "http://localhost:3000")
                .trim_end_matches('/')
                .to_string(),
            database_path: Self::get_optional_env("DB_PATH").map(PathBuf::from),
            jwt_secret: Secret::new(Self::get_env_or_default("JWT_SECRET", DEFAULT_JWT_SECRET)),
            client_id: Self::get_env_or_default("MOCK_CLIENT_ID", DEFAULT_CLIENT_ID),
            client_secret: Secret::new(Self::get_env_or_default(
                "MOCK_CLIENT_SECRET",
                DEFAULT_CLIENT_SECRET,
            )),
            callback_delay_ms: Self::parse_or_default("CALLBACK_DELAY_MS", 2000u64)?,
            oauth_token_ttl_secs: Self::parse_or_default("OAUTH_TOKEN_TTL_SECS", 3600u64)?,
            sdk_token_ttl_secs: Self::parse_or_default("SDK_TOKEN_EXPIRY", 3600u64)?,
            request_timeout_secs: Self::parse_or_default("REQUEST_TIMEOUT_SECS", 30u64)?,
            body_size_limit_bytes: Self::parse_or_default(
                "BODY_SIZE_LIMIT_BYTES",
                2 * 1024 * 1024usize,
            )?,
            log_level: Self::get_env_or_default("LOG_LEVEL", "info"),
            log_format: Self::get_env_or_default("LOG_FORMAT", "json"),
        };

        config.validate()?;

        Ok(config)
    }

    /// Get environment variable or return default value
    fn get_env_or_default(key: &str, default: &str) -> String {
        env::var(key).unwrap_or_else(|_| default.to_string())
    }

    /// Get optional environment variable; empty counts as unset
    fn get_optional_env(key: &str) -> Option<String> {
        match env::var(key) {
            Ok(value) if !value.is_empty() => Some(value),
            _ => None,
        }
    }

    /// Parse a positive number from an environment variable or return default
    fn parse_or_default<T>(key: &str, default: T) -> Result<T, MockServerError>
    where
        T: FromStr + Default + PartialEq,
        T::Err: fmt::Display,
    {
        match env::var(key) {
            Ok(value) => {
                let parsed = value.trim().parse::<T>().map_err(|e| {
                    MockServerError::ConfigurationError(format!(
                        "Invalid {} value '{}': {}",
                        key, value, e
                    ))
                })?;

                if parsed == T::default() {
                    return Err(MockServerError::ConfigurationError(format!(
                        "{} must be greater than 0",
                        key
                    )));
                }

                Ok(parsed)
            }
            _ => Ok(default),
        }
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), MockServerError> {
        Self::validate_url(&self.base_url, "BASE_URL")?;
        Self::validate_log_level(&self.log_level)?;
        Self::validate_log_format(&self.log_format)?;

        if self.client_id.is_empty() {
            return Err(MockServerError::ConfigurationError(
                "MOCK_CLIENT_ID must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Validate URL format
    fn validate_url(url: &str, key: &str) -> Result<(), MockServerError> {
        let parsed = url::Url::parse(url).map_err(|e| {
            MockServerError::ConfigurationError(format!("Invalid {} '{}': {}", key, url, e))
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(MockServerError::ConfigurationError(format!(
                "Invalid {} '{}': scheme must be http or https",
                key, url
            )));
        }
        Ok(())
    }

    /// Validate log level
    fn validate_log_level(level: &str) -> Result<(), MockServerError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&level.to_lowercase().as_str()) {
            return Err(MockServerError::ConfigurationError(format!(
                "Invalid LOG_LEVEL '{}': must be one of {}",
                level,
                valid_levels.join(", ")
            )));
        }
        Ok(())
    }

    /// Validate log format
    fn validate_log_format(format: &str) -> Result<(), MockServerError> {
        if format != "json" && format != "text" {
            return Err(MockServerError::ConfigurationError(format!(
                "Invalid LOG_FORMAT '{}': must be 'json' or 'text'",
                format
            )));
        }
        Ok(())
    }

    /// Human-readable store selection, reported by `/health`
    pub fn store_kind(&self) -> &'static str {
        if self.database_path.is_some() {
            "sqlite"
        } else {
            "memory"
        }
    }
}

impl Config {
    /// Create a test configuration
    ///
    /// Bypasses environment loading; uses the in-memory store and the
    /// default mock credentials.
    pub fn test_config() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            database_path: None,
            jwt_secret: Secret::new(DEFAULT_JWT_SECRET.to_string()),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            client_secret: Secret::new(DEFAULT_CLIENT_SECRET.to_string()),
            callback_delay_ms: 2000,
            oauth_token_ttl_secs: 3600,
            sdk_token_ttl_secs: 3600,
            request_timeout_secs: 30,
            body_size_limit_bytes: 2 * 1024 * 1024,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("port", &self.port)
            .field("base_url", &self.base_url)
            .field("database_path", &self.database_path)
            .field("jwt_secret", &"<REDACTED>")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<REDACTED>")
            .field("callback_delay_ms", &self.callback_delay_ms)
            .field("oauth_token_ttl_secs", &self.oauth_token_ttl_secs)
            .field("sdk_token_ttl_secs", &self.sdk_token_ttl_secs)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("body_size_limit_bytes", &self.body_size_limit_bytes)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .finish()
    }
}
