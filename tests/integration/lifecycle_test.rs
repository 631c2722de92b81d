//! Integration tests for minting, decoding, derivation and sliding renewal.

use serde_json::json;

use tokensmith::{ErrorKind, TokenIssuer, TokenKind, TokenRejection, TokenSettings, UserId};

use crate::helpers::{self, T0, TestApp};

#[tokio::test]
async fn test_access_token_round_trip_until_expiry() {
    let app = TestApp::new();
    let token = app.engine.for_user(TokenKind::Access, 42).unwrap();
    let encoded = token.encode().unwrap();

    app.advance(299);
    let decoded = app.engine.decode(TokenKind::Access, &encoded).unwrap();
    assert_eq!(decoded.get("user_id"), Some(json!(42)));
    assert_eq!(decoded.jti(), token.jti());
    assert_eq!(decoded.encoded(), Some(encoded.as_str()));

    // exp must lie strictly after the decoding time.
    app.advance(1);
    let err = app.engine.decode(TokenKind::Access, &encoded).unwrap_err();
    assert_eq!(err.rejection(), Some(&TokenRejection::Expired("exp".into())));
    assert_eq!(err.message, "Token 'exp' claim has expired");
}

#[tokio::test]
async fn test_kinds_are_not_interchangeable() {
    let app = TestApp::new();
    let refresh = app.engine.create(TokenKind::Refresh).unwrap().encode().unwrap();

    for kind in [TokenKind::Access, TokenKind::Sliding] {
        let err = app.engine.decode(kind, &refresh).unwrap_err();
        assert_eq!(err.rejection(), Some(&TokenRejection::WrongType));
    }
}

#[tokio::test]
async fn test_tampered_tokens_are_invalid() {
    let app = TestApp::new();
    let encoded = app.engine.create(TokenKind::Access).unwrap().encode().unwrap();

    let (signed, signature) = encoded.rsplit_once('.').unwrap();
    let first = if signature.starts_with('A') { 'B' } else { 'A' };
    let tampered = format!("{signed}.{first}{}", &signature[1..]);
    let err = app.engine.decode(TokenKind::Access, &tampered).unwrap_err();
    assert_eq!(err.rejection(), Some(&TokenRejection::Invalid));

    let other = helpers::engine(
        TokenSettings {
            signing_key: "someone-else".into(),
            ..Default::default()
        },
        app.clock.clone(),
    );
    let err = other.decode(TokenKind::Access, &encoded).unwrap_err();
    assert_eq!(err.message, "Token is invalid or expired");
}

#[tokio::test]
async fn test_refresh_derives_access_with_copied_claims() {
    let app = TestApp::new();
    let mut refresh = app.engine.for_user(TokenKind::Refresh, "alice").unwrap();
    refresh.set("scope", json!(["read"])).unwrap();
    let encoded = refresh.encode().unwrap();

    app.advance(600);
    let access = app.issuer.refresh_access(&encoded).await.unwrap();
    assert_eq!(access.kind(), TokenKind::Access);
    assert_eq!(access.get("user_id"), Some(json!("alice")));
    assert_eq!(access.get("scope"), Some(json!(["read"])));
    assert_ne!(access.jti(), refresh.jti());
    assert_eq!(access.get("exp"), Some(json!(T0 + 600 + 300)));

    let decoded = app
        .engine
        .decode(TokenKind::Access, &access.encode().unwrap())
        .unwrap();
    assert_eq!(decoded.get("token_type"), Some(json!("access")));
}

#[tokio::test]
async fn test_sliding_token_renews_until_window_closes() {
    let app = TestApp::with_settings(TokenSettings {
        sliding_lifetime_seconds: 3_600,
        sliding_refresh_lifetime_seconds: 600,
        ..helpers::settings()
    });
    let sliding = app
        .issuer
        .for_user(TokenKind::Sliding, &UserId::from(7))
        .await
        .unwrap();
    assert_eq!(sliding.get("refresh_exp"), Some(json!(T0 + 600)));

    app.advance(500);
    let renewed = app
        .issuer
        .renew_sliding(&sliding.encode().unwrap())
        .await
        .unwrap();
    assert_eq!(renewed.get("exp"), Some(json!(T0 + 500 + 3_600)));
    assert_eq!(renewed.get("refresh_exp"), Some(json!(T0 + 600)));

    app.advance(200);
    let err = app
        .issuer
        .renew_sliding(&renewed.encode().unwrap())
        .await
        .unwrap_err();
    assert_eq!(
        err.rejection(),
        Some(&TokenRejection::Expired("refresh_exp".into()))
    );
}

#[tokio::test]
async fn test_configured_claim_names_are_used() {
    let app = TestApp::with_settings(TokenSettings {
        token_type_claim: "typ".into(),
        user_id_claim: "sub".into(),
        ..helpers::settings()
    });
    let token = app.engine.for_user(TokenKind::Refresh, 3).unwrap();
    let payload = token.payload();

    assert_eq!(payload.get("typ"), Some(&json!("refresh")));
    assert_eq!(payload.get("sub"), Some(&json!(3)));
    assert!(!payload.contains_key("token_type"));
    assert!(!payload.contains_key("user_id"));
}

#[tokio::test]
async fn test_zero_lifetime_is_a_configuration_error() {
    let app = TestApp::with_settings(TokenSettings {
        access_lifetime_seconds: 0,
        ..helpers::settings()
    });
    let err = app.engine.create(TokenKind::Access).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Configuration);
    assert!(!err.is_token_error());
}
