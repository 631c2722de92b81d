//! Issuance and validation entry points.
//!
//! [`TokenIssuer`] is what the rest of an application talks to. A
//! [`TokenEngine`] is an issuer without revocation; a [`LedgerIssuer`] adds
//! the two revocation hooks (outstanding on issue, blacklist on decode) for
//! refresh and sliding tokens. [`build_issuer`] picks one at startup.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use tokensmith_core::error::{AppError, TokenRejection};
use tokensmith_core::result::AppResult;
use tokensmith_core::traits::RevocationLedger;
use tokensmith_core::types::claims::timestamp_from_value;
use tokensmith_core::types::{OutstandingToken, UserId};

use crate::token::{Token, TokenEngine, TokenKind};

/// Optional issued-at claim honoured when recording outstanding tokens.
const IAT_CLAIM: &str = "iat";

/// Result of a successful token pair generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
}

impl TokenPair {
    /// Signs both tokens.
    pub fn new(access: &Token, refresh: &Token) -> AppResult<Self> {
        Ok(Self {
            access_token: access.encode()?,
            refresh_token: refresh.encode()?,
            access_expires_at: expiry_of(access)?,
            refresh_expires_at: expiry_of(refresh)?,
        })
    }
}

/// Mints and validates tokens.
#[async_trait]
pub trait TokenIssuer: Send + Sync + std::fmt::Debug {
    /// The engine tokens are built with.
    fn engine(&self) -> &TokenEngine;

    /// The revocation capability, when this issuer has one.
    fn revocation(&self) -> Option<&dyn RevocationAware> {
        None
    }

    /// Mints a fresh token of `kind` bound to `user`.
    async fn for_user(&self, kind: TokenKind, user: &UserId) -> AppResult<Token>;

    /// Verifies and validates `encoded` as a token of `kind`.
    async fn decode(&self, kind: TokenKind, encoded: &str) -> AppResult<Token>;

    /// Mints a refresh token for `user` and the access token derived from it.
    async fn pair_for_user(&self, user: &UserId) -> AppResult<TokenPair> {
        let refresh = self.for_user(TokenKind::Refresh, user).await?;
        let access = refresh.derive_access()?;
        TokenPair::new(&access, &refresh)
    }

    /// Validates a refresh token and derives a new access token from it.
    async fn refresh_access(&self, refresh: &str) -> AppResult<Token> {
        let refresh = self.decode(TokenKind::Refresh, refresh).await?;
        refresh.derive_access()
    }

    /// Validates a sliding token and renews it in place.
    async fn renew_sliding(&self, sliding: &str) -> AppResult<Token> {
        let mut token = self.decode(TokenKind::Sliding, sliding).await?;
        token.renew_sliding()?;
        Ok(token)
    }
}

#[async_trait]
impl TokenIssuer for TokenEngine {
    fn engine(&self) -> &TokenEngine {
        self
    }

    async fn for_user(&self, kind: TokenKind, user: &UserId) -> AppResult<Token> {
        TokenEngine::for_user(self, kind, user.clone())
    }

    async fn decode(&self, kind: TokenKind, encoded: &str) -> AppResult<Token> {
        TokenEngine::decode(self, kind, encoded)
    }
}

/// The revocation capability: hooks into an outstanding/blacklist ledger.
#[async_trait]
pub trait RevocationAware: TokenIssuer {
    /// The ledger backing this issuer.
    fn ledger(&self) -> &dyn RevocationLedger;

    /// Fails with a blacklisted rejection if the token's id is revoked.
    async fn check_blacklist(&self, token: &Token) -> AppResult<()> {
        let jti = token_id(token)?;
        if self.ledger().is_blacklisted(jti).await.map_err(ledger_failure)? {
            warn!(kind = %token.kind(), jti, "Rejected blacklisted token");
            return Err(AppError::token(TokenRejection::Blacklisted));
        }
        Ok(())
    }

    /// Records a token as outstanding for `user`.
    ///
    /// The issue time is the token's `iat` claim when it carries one and the
    /// token's captured time otherwise. For a decoded token without `iat`
    /// that is the time it was decoded.
    async fn record_outstanding(&self, token: &Token, user: &UserId) -> AppResult<()> {
        let record = OutstandingToken {
            user: user.clone(),
            jti: token_id(token)?.to_string(),
            token: token.encode()?,
            issued_at: issued_at_of(token),
            expires_at: expiry_of(token)?,
        };
        self.ledger()
            .record_outstanding(record)
            .await
            .map_err(ledger_failure)
    }

    /// Blacklists a token. Returns `false` if it already was.
    ///
    /// A token the ledger has never seen is recorded as outstanding first,
    /// provided it names its principal.
    async fn blacklist(&self, token: &Token) -> AppResult<bool> {
        if !token.kind().is_revocable() {
            return Err(AppError::configuration(format!(
                "'{}' tokens are not tracked by the revocation ledger",
                token.kind()
            )));
        }

        let jti = token_id(token)?;
        let known = self
            .ledger()
            .find_outstanding(jti)
            .await
            .map_err(ledger_failure)?
            .is_some();
        if !known {
            let claim = &self.engine().settings().user_id_claim;
            if let Some(user) = token.get(claim).as_ref().and_then(UserId::from_claim) {
                self.record_outstanding(token, &user).await?;
            }
        }

        let added = self
            .ledger()
            .blacklist(jti, expiry_of(token)?)
            .await
            .map_err(ledger_failure)?;
        info!(kind = %token.kind(), jti, added, "Blacklisted token");
        Ok(added)
    }

    /// Blacklists every outstanding token of `user`.
    async fn revoke_user(&self, user: &UserId) -> AppResult<u64> {
        let count = self
            .ledger()
            .blacklist_user(user)
            .await
            .map_err(ledger_failure)?;
        info!(%user, count, "Revoked all outstanding tokens of user");
        Ok(count)
    }
}

/// An issuer with revocation hooks wired to a ledger.
#[derive(Debug, Clone)]
pub struct LedgerIssuer {
    engine: TokenEngine,
    ledger: Arc<dyn RevocationLedger>,
}

impl LedgerIssuer {
    /// Wraps `engine` with revocation hooks backed by `ledger`.
    pub fn new(engine: TokenEngine, ledger: Arc<dyn RevocationLedger>) -> Self {
        Self { engine, ledger }
    }
}

#[async_trait]
impl TokenIssuer for LedgerIssuer {
    fn engine(&self) -> &TokenEngine {
        &self.engine
    }

    fn revocation(&self) -> Option<&dyn RevocationAware> {
        Some(self)
    }

    async fn for_user(&self, kind: TokenKind, user: &UserId) -> AppResult<Token> {
        let token = self.engine.for_user(kind, user.clone())?;
        if kind.is_revocable() {
            self.record_outstanding(&token, user).await?;
            debug!(%kind, %user, jti = ?token.jti(), "Recorded outstanding token");
        }
        Ok(token)
    }

    async fn decode(&self, kind: TokenKind, encoded: &str) -> AppResult<Token> {
        let token = self.engine.decode(kind, encoded)?;
        if kind.is_revocable() {
            self.check_blacklist(&token).await?;
        }
        Ok(token)
    }
}

#[async_trait]
impl RevocationAware for LedgerIssuer {
    fn ledger(&self) -> &dyn RevocationLedger {
        self.ledger.as_ref()
    }
}

/// Selects the issuer for a deployment: revocation hooks only when a ledger
/// is configured.
pub fn build_issuer(
    engine: TokenEngine,
    ledger: Option<Arc<dyn RevocationLedger>>,
) -> Arc<dyn TokenIssuer> {
    match ledger {
        Some(ledger) => {
            info!(?ledger, "Token revocation enabled");
            Arc::new(LedgerIssuer::new(engine, ledger))
        }
        None => {
            info!("Token revocation disabled");
            Arc::new(engine)
        }
    }
}

fn token_id(token: &Token) -> AppResult<&str> {
    token
        .jti()
        .ok_or_else(|| AppError::token(TokenRejection::NoId))
}

fn issued_at_of(token: &Token) -> DateTime<Utc> {
    token
        .get(IAT_CLAIM)
        .as_ref()
        .and_then(timestamp_from_value)
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .unwrap_or_else(|| token.current_time())
}

fn expiry_of(token: &Token) -> AppResult<DateTime<Utc>> {
    token
        .expires_at()
        .ok_or_else(|| AppError::token(TokenRejection::MissingClaim("exp".into())))
}

/// Keeps every ledger failure in the ledger category, whatever the backend
/// reported it as.
fn ledger_failure(err: AppError) -> AppError {
    if err.is_ledger_error() {
        err
    } else {
        AppError::ledger(format!("Revocation ledger failed: {}", err.message))
    }
}
