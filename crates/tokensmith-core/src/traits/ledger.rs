//! Revocation ledger trait for pluggable storage backends.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::result::AppResult;
use crate::types::{OutstandingToken, UserId};

/// Store of issued (outstanding) and blacklisted token ids.
///
/// Every method may fail with an [`ErrorKind::Ledger`](crate::ErrorKind)
/// error. Callers must not read a ledger failure as "token revoked".
#[async_trait]
pub trait RevocationLedger: Send + Sync + std::fmt::Debug + 'static {
    /// Record a freshly issued token.
    async fn record_outstanding(&self, token: OutstandingToken) -> AppResult<()>;

    /// Whether `jti` has been blacklisted.
    async fn is_blacklisted(&self, jti: &str) -> AppResult<bool>;

    /// Blacklist `jti` until `expires_at`. Returns `false` if it already was.
    async fn blacklist(&self, jti: &str, expires_at: DateTime<Utc>) -> AppResult<bool>;

    /// Look up an outstanding token by id.
    async fn find_outstanding(&self, jti: &str) -> AppResult<Option<OutstandingToken>>;

    /// All outstanding tokens issued to `user`.
    async fn outstanding_for_user(&self, user: &UserId) -> AppResult<Vec<OutstandingToken>>;

    /// Blacklist every outstanding token of `user`. Returns how many were
    /// newly blacklisted.
    async fn blacklist_user(&self, user: &UserId) -> AppResult<u64> {
        let mut count = 0;
        for token in self.outstanding_for_user(user).await? {
            if self.blacklist(&token.jti, token.expires_at).await? {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Drop outstanding and blacklist entries whose token expired by `now`.
    /// Returns the number of records removed.
    async fn flush_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;

    /// Check that the ledger backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
