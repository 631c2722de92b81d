//! Integration tests for configuration loading.

use serde_json::json;

use tokensmith::{AppConfig, TokenIssuer, TokenKind, UserId};

#[tokio::test]
async fn test_fixture_config_drives_the_issuer() {
    let config = AppConfig::load("tests/fixtures/test_config.toml").expect("fixture config");
    assert_eq!(config.token.algorithm, "HS512");
    assert_eq!(config.token.access_lifetime_seconds, 60);
    assert_eq!(config.logging.format, "json");

    let issuer = tokensmith::issuer_from_config(&config).await.unwrap();
    assert!(issuer.revocation().is_some());

    let token = issuer
        .for_user(TokenKind::Refresh, &UserId::from(8))
        .await
        .unwrap();
    assert_eq!(token.get("typ"), Some(json!("refresh")));
    assert_eq!(token.get("sub"), Some(json!(8)));

    assert_eq!(
        token.get("exp"),
        Some(json!(token.current_time().timestamp() + 3_600))
    );
}
