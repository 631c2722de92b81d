//! # tokensmith
//!
//! Signed, self-contained authorization tokens for stateless session
//! management.
//!
//! Three token kinds are supported: short-lived access tokens, long-lived
//! refresh tokens that mint access tokens, and sliding tokens that act as
//! both and are renewed in place. Refresh and sliding tokens can be revoked
//! through an optional ledger of outstanding and blacklisted token ids.
//!
//! ```ignore
//! let config = AppConfig::load("config/default")?;
//! let issuer = tokensmith::issuer_from_config(&config).await?;
//!
//! let pair = issuer.pair_for_user(&UserId::from(42)).await?;
//! let access = issuer.refresh_access(&pair.refresh_token).await?;
//! ```

use std::sync::Arc;

use tracing::info;

pub use tokensmith_auth::{
    JwtBackend, LedgerIssuer, RevocationAware, Token, TokenEngine, TokenIssuer, TokenKind,
    TokenPair, TokenVariant, build_issuer,
};
pub use tokensmith_core::config::{AppConfig, LedgerConfig, LoggingConfig, TokenSettings};
pub use tokensmith_core::traits::{Clock, FixedClock, RevocationLedger, SystemClock, TokenBackend};
pub use tokensmith_core::types::{Claims, OutstandingToken, RawClaims, UserId};
pub use tokensmith_core::{AppError, AppResult, ErrorKind, TokenRejection};
pub use tokensmith_ledger::LedgerManager;

/// Builds the issuer a deployment asks for: a signing engine on the wall
/// clock, wrapped with revocation hooks when the ledger is enabled.
pub async fn issuer_from_config(config: &AppConfig) -> AppResult<Arc<dyn TokenIssuer>> {
    let engine = TokenEngine::from_settings(config.token.clone())?;
    let ledger = LedgerManager::from_config(&config.ledger).await?;
    info!(
        algorithm = %config.token.algorithm,
        revocation = ledger.is_some(),
        "Token issuer ready"
    );
    Ok(build_issuer(engine, ledger))
}
