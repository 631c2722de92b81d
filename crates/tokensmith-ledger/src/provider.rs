//! Ledger manager that dispatches to the configured provider.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use tokensmith_core::config::LedgerConfig;
use tokensmith_core::error::AppError;
use tokensmith_core::result::AppResult;
use tokensmith_core::traits::RevocationLedger;
use tokensmith_core::types::{OutstandingToken, UserId};

/// Ledger manager that wraps the configured ledger provider.
///
/// The provider is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct LedgerManager {
    /// The inner ledger provider.
    inner: Arc<dyn RevocationLedger>,
}

impl LedgerManager {
    /// Create a new ledger manager from configuration.
    pub async fn new(config: &LedgerConfig) -> AppResult<Self> {
        let inner: Arc<dyn RevocationLedger> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                info!("Initializing Redis revocation ledger");
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisLedger::new(client))
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory revocation ledger");
                Arc::new(crate::memory::MemoryLedger::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown ledger provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// The configured ledger, or `None` when revocation is disabled.
    pub async fn from_config(config: &LedgerConfig) -> AppResult<Option<Arc<dyn RevocationLedger>>> {
        if !config.enabled {
            info!("Revocation ledger disabled");
            return Ok(None);
        }
        let ledger: Arc<dyn RevocationLedger> = Arc::new(Self::new(config).await?);
        Ok(Some(ledger))
    }
}

#[async_trait]
impl RevocationLedger for LedgerManager {
    async fn record_outstanding(&self, token: OutstandingToken) -> AppResult<()> {
        self.inner.record_outstanding(token).await
    }

    async fn is_blacklisted(&self, jti: &str) -> AppResult<bool> {
        self.inner.is_blacklisted(jti).await
    }

    async fn blacklist(&self, jti: &str, expires_at: DateTime<Utc>) -> AppResult<bool> {
        self.inner.blacklist(jti, expires_at).await
    }

    async fn find_outstanding(&self, jti: &str) -> AppResult<Option<OutstandingToken>> {
        self.inner.find_outstanding(jti).await
    }

    async fn outstanding_for_user(&self, user: &UserId) -> AppResult<Vec<OutstandingToken>> {
        self.inner.outstanding_for_user(user).await
    }

    async fn blacklist_user(&self, user: &UserId) -> AppResult<u64> {
        self.inner.blacklist_user(user).await
    }

    async fn flush_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        self.inner.flush_expired(now).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
