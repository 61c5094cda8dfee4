// OAuth2 client credentials carried in `Authorization: Basic`

use base64::{engine::general_purpose::STANDARD, Engine as _};
use secrecy::{ExposeSecret, Secret};
use std::fmt;
use subtle::ConstantTimeEq;

use crate::core::errors::MockServerError;

/// Client id/secret pair decoded from a Basic authorization header
pub struct ClientCredentials {
    client_id: String,
    client_secret: Secret<String>,
}

impl ClientCredentials {
    pub fn new(client_id: &str, client_secret: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            client_secret: Secret::new(client_secret.to_string()),
        }
    }

    /// Parse the value of an `Authorization` header.
    ///
    /// A missing `Basic ` scheme yields `MissingBasicAuth`; anything that is
    /// not base64 of UTF-8 `id:secret` yields `MalformedAuthorization`.
    pub fn from_header(value: &str) -> Result<Self, MockServerError> {
        let encoded = value
            .strip_prefix("Basic ")
            .ok_or(MockServerError::MissingBasicAuth)?;

        let decoded = STANDARD
            .decode(encoded.trim())
            .map_err(|_| MockServerError::MalformedAuthorization)?;
        let decoded =
            String::from_utf8(decoded).map_err(|_| MockServerError::MalformedAuthorization)?;

        let (client_id, client_secret) = decoded
            .split_once(':')
            .ok_or(MockServerError::MalformedAuthorization)?;

        Ok(Self::new(client_id, client_secret))
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Compare against the configured pair in constant time
    pub fn matches(&self, expected_id: &str, expected_secret: &Secret<String>) -> bool {
        let id_ok = self.client_id.as_bytes().ct_eq(expected_id.as_bytes());
        let secret_ok = self
            .client_secret
            .expose_secret()
            .as_bytes()
            .ct_eq(expected_secret.expose_secret().as_bytes());
        (id_ok & secret_ok).into()
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<REDACTED>")
            .finish()
    }
}
