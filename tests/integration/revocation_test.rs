//! Integration tests for the revocation ledger hooks.

use std::sync::Arc;

use tokensmith::{
    AppConfig, LedgerIssuer, RevocationAware, RevocationLedger, TokenIssuer, TokenKind,
    TokenRejection, UserId,
};

use crate::helpers::{FailingLedger, T0, TestApp};

#[tokio::test]
async fn test_blacklisted_refresh_cannot_mint_access() {
    let app = TestApp::new();
    let user = UserId::from(11);
    let pair = app.issuer.pair_for_user(&user).await.unwrap();

    let refresh = app
        .issuer
        .decode(TokenKind::Refresh, &pair.refresh_token)
        .await
        .unwrap();
    assert!(app.issuer.blacklist(&refresh).await.unwrap());

    let err = app
        .issuer
        .refresh_access(&pair.refresh_token)
        .await
        .unwrap_err();
    assert_eq!(err.rejection(), Some(&TokenRejection::Blacklisted));
    assert_eq!(err.message, "Token is blacklisted");

    // Access tokens are not tracked and stay valid until they expire.
    assert!(
        app.issuer
            .decode(TokenKind::Access, &pair.access_token)
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_issuing_records_outstanding_tokens() {
    let app = TestApp::new();
    let user = UserId::from("dora");
    app.issuer.for_user(TokenKind::Refresh, &user).await.unwrap();
    app.advance(10);
    app.issuer.for_user(TokenKind::Sliding, &user).await.unwrap();
    app.issuer.for_user(TokenKind::Access, &user).await.unwrap();

    let outstanding = app.ledger.outstanding_for_user(&user).await.unwrap();
    assert_eq!(outstanding.len(), 2);
    assert_eq!(outstanding[0].issued_at.timestamp(), T0);
    assert_eq!(outstanding[1].issued_at.timestamp(), T0 + 10);
}

#[tokio::test]
async fn test_revoke_user_then_flush() {
    let app = TestApp::new();
    let user = UserId::from(12);
    let refresh = app
        .issuer
        .for_user(TokenKind::Refresh, &user)
        .await
        .unwrap()
        .encode()
        .unwrap();

    assert_eq!(app.issuer.revoke_user(&user).await.unwrap(), 1);
    assert_eq!(app.issuer.revoke_user(&user).await.unwrap(), 0);
    let err = app
        .issuer
        .decode(TokenKind::Refresh, &refresh)
        .await
        .unwrap_err();
    assert_eq!(err.rejection(), Some(&TokenRejection::Blacklisted));

    // Nothing has expired yet.
    let now = app.engine.now();
    assert_eq!(app.ledger.flush_expired(now).await.unwrap(), 0);

    app.advance(86_400);
    let now = app.engine.now();
    assert_eq!(app.ledger.flush_expired(now).await.unwrap(), 2);
    assert!(app.ledger.outstanding_for_user(&user).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_ledger_outage_surfaces_as_ledger_error() {
    let app = TestApp::new();
    let issuer = LedgerIssuer::new(app.engine.clone(), Arc::new(FailingLedger));
    let refresh = app
        .engine
        .create(TokenKind::Refresh)
        .unwrap()
        .encode()
        .unwrap();

    let err = issuer
        .decode(TokenKind::Refresh, &refresh)
        .await
        .unwrap_err();
    assert!(err.is_ledger_error());
    assert!(!err.is_token_error());

    let err = issuer.pair_for_user(&UserId::from(1)).await.unwrap_err();
    assert!(err.is_ledger_error());

    // Access tokens never touch the ledger.
    let access = issuer
        .for_user(TokenKind::Access, &UserId::from(1))
        .await
        .unwrap();
    assert!(
        issuer
            .decode(TokenKind::Access, &access.encode().unwrap())
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_issuer_from_config_selects_revocation() {
    let mut config = AppConfig::default();
    let plain = tokensmith::issuer_from_config(&config).await.unwrap();
    assert!(plain.revocation().is_none());

    config.ledger.enabled = true;
    let tracked = tokensmith::issuer_from_config(&config).await.unwrap();
    let revocation = tracked.revocation().expect("revocation enabled");

    let token = tracked
        .for_user(TokenKind::Sliding, &UserId::from(5))
        .await
        .unwrap();
    revocation.blacklist(&token).await.unwrap();
    let err = tracked
        .decode(TokenKind::Sliding, &token.encode().unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.rejection(), Some(&TokenRejection::Blacklisted));
}
