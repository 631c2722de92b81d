//! Ledger record of an issued token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserId;

/// A token issued to a principal and tracked by the revocation ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingToken {
    /// The principal the token was issued for.
    pub user: UserId,
    /// The token id (revocation key).
    pub jti: String,
    /// The signed token as handed to the client.
    pub token: String,
    /// When the token was minted.
    pub issued_at: DateTime<Utc>,
    /// When the token's `exp` claim runs out.
    pub expires_at: DateTime<Utc>,
}

impl OutstandingToken {
    /// Whether the token has expired as of `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
