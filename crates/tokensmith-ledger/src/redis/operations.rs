//! Redis revocation ledger implementation.
//!
//! Layout (all keys carry the configured prefix):
//!
//! - `outstanding:{jti}`: JSON [`OutstandingToken`], expiring with the token
//! - `user:i:{id}` / `user:s:{id}`: set of token ids issued to the user
//! - `blacklist:{jti}`: expiry timestamp of the revoked token, expiring with it

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use tracing::debug;

use tokensmith_core::error::{AppError, ErrorKind};
use tokensmith_core::result::AppResult;
use tokensmith_core::traits::RevocationLedger;
use tokensmith_core::types::{OutstandingToken, UserId};

use super::client::RedisClient;
use crate::keys;

/// Redis-backed revocation ledger.
#[derive(Debug, Clone)]
pub struct RedisLedger {
    /// Redis client.
    client: RedisClient,
}

impl RedisLedger {
    /// Create a new Redis ledger.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Ledger, format!("Redis error: {e}"), e)
    }

    /// Seconds until `expires_at`, at least one so Redis accepts it.
    fn ttl_until(expires_at: DateTime<Utc>) -> u64 {
        (expires_at - Utc::now()).num_seconds().max(1) as u64
    }

    fn parse_record(raw: &str) -> AppResult<OutstandingToken> {
        serde_json::from_str(raw).map_err(|e| {
            AppError::with_source(ErrorKind::Ledger, "Corrupt outstanding token record", e)
        })
    }

    async fn load_outstanding(&self, jti: &str) -> AppResult<Option<OutstandingToken>> {
        let key = self.client.prefixed_key(&keys::outstanding(jti));
        let mut conn = self.client.conn_mut();
        let raw: Option<String> = conn.get(&key).await.map_err(Self::map_err)?;
        raw.as_deref().map(Self::parse_record).transpose()
    }
}

/// The records that belong to `user`, oldest first.
fn issued_to(records: Vec<OutstandingToken>, user: &UserId) -> Vec<OutstandingToken> {
    let mut tokens: Vec<OutstandingToken> = records
        .into_iter()
        .filter(|token| &token.user == user)
        .collect();
    tokens.sort_by_key(|t| t.issued_at);
    tokens
}

#[async_trait]
impl RevocationLedger for RedisLedger {
    async fn record_outstanding(&self, token: OutstandingToken) -> AppResult<()> {
        let record_key = self.client.prefixed_key(&keys::outstanding(&token.jti));
        let user_key = self.client.prefixed_key(&keys::user_tokens(&token.user));
        let payload = serde_json::to_string(&token).map_err(|e| {
            AppError::with_source(ErrorKind::Ledger, "Failed to serialize outstanding token", e)
        })?;

        let mut conn = self.client.conn_mut();
        let _: () = conn
            .set_ex(&record_key, payload, Self::ttl_until(token.expires_at))
            .await
            .map_err(Self::map_err)?;
        let _: () = conn
            .sadd(&user_key, &token.jti)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn is_blacklisted(&self, jti: &str) -> AppResult<bool> {
        let key = self.client.prefixed_key(&keys::blacklisted(jti));
        let mut conn = self.client.conn_mut();
        let result: bool = conn.exists(&key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn blacklist(&self, jti: &str, expires_at: DateTime<Utc>) -> AppResult<bool> {
        let key = self.client.prefixed_key(&keys::blacklisted(jti));
        let mut conn = self.client.conn_mut();

        // SET key expiry EX ttl NX
        let result: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(expires_at.timestamp())
            .arg("EX")
            .arg(Self::ttl_until(expires_at))
            .arg("NX")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        Ok(result.is_some())
    }

    async fn find_outstanding(&self, jti: &str) -> AppResult<Option<OutstandingToken>> {
        self.load_outstanding(jti).await
    }

    async fn outstanding_for_user(&self, user: &UserId) -> AppResult<Vec<OutstandingToken>> {
        let user_key = self.client.prefixed_key(&keys::user_tokens(user));
        let mut conn = self.client.conn_mut();
        let jtis: Vec<String> = conn.smembers(&user_key).await.map_err(Self::map_err)?;

        let mut records = Vec::with_capacity(jtis.len());
        for jti in &jtis {
            // Members whose record has already expired out of Redis are skipped.
            if let Some(token) = self.load_outstanding(jti).await? {
                records.push(token);
            }
        }
        Ok(issued_to(records, user))
    }

    async fn flush_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let mut conn = self.client.conn_mut();
        let mut removed = 0u64;

        let user_keys: Vec<String> = redis::cmd("KEYS")
            .arg(self.client.prefixed_key(keys::user_tokens_pattern()))
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        for user_key in &user_keys {
            let jtis: Vec<String> = conn.smembers(user_key).await.map_err(Self::map_err)?;
            for jti in &jtis {
                let live = match self.load_outstanding(jti).await? {
                    Some(token) => !token.is_expired(now),
                    None => false,
                };
                if live {
                    continue;
                }
                let record_key = self.client.prefixed_key(&keys::outstanding(jti));
                let _: () = conn.del(&record_key).await.map_err(Self::map_err)?;
                let _: () = conn.srem(user_key, jti).await.map_err(Self::map_err)?;
                removed += 1;
            }
        }

        let blacklist_keys: Vec<String> = redis::cmd("KEYS")
            .arg(self.client.prefixed_key(&keys::blacklisted("*")))
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;

        for key in &blacklist_keys {
            let expiry: Option<i64> = conn.get(key).await.map_err(Self::map_err)?;
            if expiry.is_some_and(|ts| ts <= now.timestamp()) {
                let _: () = conn.del(key).await.map_err(Self::map_err)?;
                debug!(key = self.client.unprefixed_key(key), "Dropped expired blacklist entry");
                removed += 1;
            }
        }

        debug!(removed, "Flushed expired ledger entries");
        Ok(removed)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
