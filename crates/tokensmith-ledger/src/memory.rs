//! In-memory revocation ledger using dashmap.
//!
//! Entries are never evicted on capacity; dropping a blacklist entry early
//! would make a revoked token valid again. Expired records are removed only
//! by [`RevocationLedger::flush_expired`].

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use tokensmith_core::result::AppResult;
use tokensmith_core::traits::RevocationLedger;
use tokensmith_core::types::{OutstandingToken, UserId};

/// In-process revocation ledger.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    /// Outstanding tokens by id.
    outstanding: Arc<DashMap<String, OutstandingToken>>,
    /// Blacklisted token ids and the expiry of the token they revoke.
    blacklist: Arc<DashMap<String, DateTime<Utc>>>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RevocationLedger for MemoryLedger {
    async fn record_outstanding(&self, token: OutstandingToken) -> AppResult<()> {
        self.outstanding.insert(token.jti.clone(), token);
        Ok(())
    }

    async fn is_blacklisted(&self, jti: &str) -> AppResult<bool> {
        Ok(self.blacklist.contains_key(jti))
    }

    async fn blacklist(&self, jti: &str, expires_at: DateTime<Utc>) -> AppResult<bool> {
        match self.blacklist.entry(jti.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(entry) => {
                entry.insert(expires_at);
                Ok(true)
            }
        }
    }

    async fn find_outstanding(&self, jti: &str) -> AppResult<Option<OutstandingToken>> {
        Ok(self.outstanding.get(jti).map(|entry| entry.value().clone()))
    }

    async fn outstanding_for_user(&self, user: &UserId) -> AppResult<Vec<OutstandingToken>> {
        let mut tokens: Vec<OutstandingToken> = self
            .outstanding
            .iter()
            .filter(|entry| &entry.value().user == user)
            .map(|entry| entry.value().clone())
            .collect();
        tokens.sort_by_key(|t| t.issued_at);
        Ok(tokens)
    }

    async fn flush_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut removed = 0u64;
        self.outstanding.retain(|_, token| {
            let keep = !token.is_expired(now);
            removed += u64::from(!keep);
            keep
        });
        self.blacklist.retain(|_, expires_at| {
            let keep = *expires_at > now;
            removed += u64::from(!keep);
            keep
        });

        debug!(removed, "Flushed expired ledger entries");
        Ok(removed)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
