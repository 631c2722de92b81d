//! Revocation ledger configuration.

use serde::{Deserialize, Serialize};

/// Revocation ledger configuration.
///
/// When `enabled` is false no ledger is constructed and refresh/sliding
/// tokens are issued and validated without revocation hooks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Whether revocation hooks are wired in.
    #[serde(default)]
    pub enabled: bool,
    /// Ledger provider: `"memory"` or `"redis"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Redis-specific settings.
    #[serde(default)]
    pub redis: RedisLedgerConfig,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: default_provider(),
            redis: RedisLedgerConfig::default(),
        }
    }
}

/// Redis ledger backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisLedgerConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Key prefix for all ledger keys.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for RedisLedgerConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: default_key_prefix(),
        }
    }
}

impl RedisLedgerConfig {
    /// The connection URL with any password replaced by `****`, for logs
    /// and display.
    pub fn masked_url(&self) -> String {
        mask_url_password(&self.url)
    }
}

fn mask_url_password(url: &str) -> String {
    let Some(at_pos) = url.find('@') else {
        return url.to_string();
    };
    let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
    match url[..at_pos].rfind(':') {
        Some(colon_pos) if colon_pos >= scheme_end => {
            format!("{}:****{}", &url[..colon_pos], &url[at_pos..])
        }
        _ => url.to_string(),
    }
}

fn default_provider() -> String {
    "memory".to_string()
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

fn default_key_prefix() -> String {
    "tokensmith:".to_string()
}
