// Token minting and verification: HS256 JWTs for OAuth2, SDK and API credentials

use crate::core::errors::MockServerError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Which credential a token represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Oauth2,
    Sdk,
    Api,
}

/// JWT claims carried by every issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_execution_id: Option<String>,
    pub iat: u64,
    pub exp: u64,
    pub iss: String,
}

/// Signs and verifies bearer tokens with a shared HMAC secret
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl TokenIssuer {
    /// Create an issuer; `issuer` becomes the `iss` claim (the public base URL)
    pub fn new(secret: &Secret<String>, issuer: &str) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            issuer: issuer.to_string(),
        }
    }

    /// Client-credentials access token with full scope
    pub fn issue_oauth2_token(&self, ttl_secs: u64) -> Result<String, MockServerError> {
        self.issue(TokenKind::Oauth2, Some("full"), None, None, ttl_secs)
    }

    /// Token handed to the hosted SDK for one workflow execution
    pub fn issue_sdk_token(
        &self,
        account_id: &str,
        workflow_execution_id: &str,
        ttl_secs: u64,
    ) -> Result<String, MockServerError> {
        self.issue(
            TokenKind::Sdk,
            None,
            Some(account_id),
            Some(workflow_execution_id),
            ttl_secs,
        )
    }

    /// Token for the credential upload API of one workflow execution
    pub fn issue_api_token(
        &self,
        workflow_execution_id: &str,
        ttl_secs: u64,
    ) -> Result<String, MockServerError> {
        self.issue(TokenKind::Api, None, None, Some(workflow_execution_id), ttl_secs)
    }

    fn issue(
        &self,
        kind: TokenKind,
        scope: Option<&str>,
        account_id: Option<&str>,
        workflow_execution_id: Option<&str>,
        ttl_secs: u64,
    ) -> Result<String, MockServerError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| MockServerError::TokenError(format!("System time error: {}", e)))?
            .as_secs();

        let exp = now
            .checked_add(ttl_secs)
            .ok_or_else(|| MockServerError::TokenError("Token lifetime overflows".to_string()))?;

        let claims = TokenClaims {
            kind,
            scope: scope.map(str::to_string),
            account_id: account_id.map(str::to_string),
            workflow_execution_id: workflow_execution_id.map(str::to_string),
            iat: now,
            exp,
            iss: self.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| MockServerError::TokenError(format!("Failed to sign token: {}", e)))
    }

    /// Verify signature, algorithm and expiry (no leeway)
    pub fn verify(&self, token: &str) -> Result<TokenClaims, MockServerError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| MockServerError::InvalidToken(e.to_string()))
    }
}
