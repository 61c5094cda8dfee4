// Token issuance and configuration checks

use kyc_mock_server::config::{Config, DEFAULT_JWT_SECRET};
use kyc_mock_server::core::crypto::{TokenIssuer, TokenKind};
use kyc_mock_server::core::errors::MockServerError;
use kyc_mock_server::core::ids::{
    generate_account_id, generate_credential_id, generate_workflow_execution_id,
};
use secrecy::Secret;
use std::collections::HashSet;

fn issuer(secret: &str) -> TokenIssuer {
    TokenIssuer::new(&Secret::new(secret.to_string()), "http://localhost:3000")
}

#[test]
fn test_oauth2_token_round_trip() {
    let issuer = issuer(DEFAULT_JWT_SECRET);
    let token = issuer.issue_oauth2_token(3600).unwrap();
    let claims = issuer.verify(&token).unwrap();

    assert_eq!(claims.kind, TokenKind::Oauth2);
    assert_eq!(claims.scope.as_deref(), Some("full"));
    assert_eq!(claims.iss, "http://localhost:3000");
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[test]
fn test_sdk_token_carries_ids() {
    let issuer = issuer(DEFAULT_JWT_SECRET);
    let token = issuer.issue_sdk_token("acc_1", "wfe_1", 60).unwrap();
    let claims = issuer.verify(&token).unwrap();

    assert_eq!(claims.kind, TokenKind::Sdk);
    assert_eq!(claims.account_id.as_deref(), Some("acc_1"));
    assert_eq!(claims.workflow_execution_id.as_deref(), Some("wfe_1"));
}

#[test]
fn test_token_from_other_secret_rejected() {
    let token = issuer("some-other-secret").issue_api_token("wfe_1", 60).unwrap();
    let err = issuer(DEFAULT_JWT_SECRET).verify(&token).unwrap_err();
    assert!(matches!(err, MockServerError::InvalidToken(_)));
}

#[test]
fn test_garbage_token_rejected() {
    let err = issuer(DEFAULT_JWT_SECRET).verify("not.a.jwt").unwrap_err();
    assert!(matches!(err, MockServerError::InvalidToken(_)));
}

#[test]
fn test_generated_ids_are_prefixed_and_unique() {
    let accounts: HashSet<String> = (0..100).map(|_| generate_account_id()).collect();
    assert_eq!(accounts.len(), 100);
    assert!(accounts.iter().all(|id| id.starts_with("acc_")));
    assert!(generate_workflow_execution_id().starts_with("wfe_"));
    assert!(generate_credential_id().starts_with("crd_"));
}

#[test]
fn test_config_defaults_validate() {
    let config = Config::test_config();
    assert!(config.validate().is_ok());
    assert_eq!(config.store_kind(), "memory");
}

#[test]
fn test_config_rejects_bad_base_url() {
    let mut config = Config::test_config();
    config.base_url = "ftp://mock.local".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_debug_redacts_secrets() {
    let debug = format!("{:?}", Config::test_config());
    assert!(debug.contains("<REDACTED>"));
    assert!(!debug.contains(DEFAULT_JWT_SECRET));
}
