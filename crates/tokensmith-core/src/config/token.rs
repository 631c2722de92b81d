//! Token signing and lifetime configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Claim names that are always reserved by the token core.
pub const RESERVED_CLAIMS: [&str; 2] = ["exp", "jti"];

/// Token issuance settings. Read-only after startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSettings {
    /// Secret key for HMAC signing.
    #[serde(default = "default_signing_key")]
    pub signing_key: String,
    /// Signing algorithm: `"HS256"`, `"HS384"` or `"HS512"`.
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    /// Access token lifetime in seconds.
    #[serde(default = "default_short_lifetime")]
    pub access_lifetime_seconds: i64,
    /// Refresh token lifetime in seconds.
    #[serde(default = "default_long_lifetime")]
    pub refresh_lifetime_seconds: i64,
    /// Sliding token usage lifetime in seconds.
    #[serde(default = "default_short_lifetime")]
    pub sliding_lifetime_seconds: i64,
    /// Window during which a sliding token may be renewed in place.
    #[serde(default = "default_long_lifetime")]
    pub sliding_refresh_lifetime_seconds: i64,
    /// Claim that carries the token kind.
    #[serde(default = "default_token_type_claim")]
    pub token_type_claim: String,
    /// Claim that binds a token to its principal.
    #[serde(default = "default_user_id_claim")]
    pub user_id_claim: String,
    /// Claim that carries the sliding renewal boundary.
    #[serde(default = "default_sliding_refresh_exp_claim")]
    pub sliding_refresh_exp_claim: String,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self {
            signing_key: default_signing_key(),
            algorithm: default_algorithm(),
            access_lifetime_seconds: default_short_lifetime(),
            refresh_lifetime_seconds: default_long_lifetime(),
            sliding_lifetime_seconds: default_short_lifetime(),
            sliding_refresh_lifetime_seconds: default_long_lifetime(),
            token_type_claim: default_token_type_claim(),
            user_id_claim: default_user_id_claim(),
            sliding_refresh_exp_claim: default_sliding_refresh_exp_claim(),
        }
    }
}

impl TokenSettings {
    /// Access token lifetime.
    pub fn access_lifetime(&self) -> Duration {
        lifetime(self.access_lifetime_seconds)
    }

    /// Refresh token lifetime.
    pub fn refresh_lifetime(&self) -> Duration {
        lifetime(self.refresh_lifetime_seconds)
    }

    /// Sliding token usage lifetime.
    pub fn sliding_lifetime(&self) -> Duration {
        lifetime(self.sliding_lifetime_seconds)
    }

    /// Sliding token renewal window.
    pub fn sliding_refresh_lifetime(&self) -> Duration {
        lifetime(self.sliding_refresh_lifetime_seconds)
    }

    /// Checks the settings that would otherwise fail at signing time or
    /// corrupt the claim layout.
    ///
    /// Lifetimes must fit in a [`Duration`]. A non-positive lifetime is not
    /// rejected here; it is reported when a token of that kind is constructed.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.signing_key.is_empty() {
            return Err(AppError::configuration("Token signing key must not be empty"));
        }

        if !matches!(self.algorithm.as_str(), "HS256" | "HS384" | "HS512") {
            return Err(AppError::configuration(format!(
                "Unsupported signing algorithm: '{}'. Supported: HS256, HS384, HS512",
                self.algorithm
            )));
        }

        let lifetimes = [
            ("access_lifetime_seconds", self.access_lifetime_seconds),
            ("refresh_lifetime_seconds", self.refresh_lifetime_seconds),
            ("sliding_lifetime_seconds", self.sliding_lifetime_seconds),
            (
                "sliding_refresh_lifetime_seconds",
                self.sliding_refresh_lifetime_seconds,
            ),
        ];
        for (field, seconds) in lifetimes {
            if Duration::try_seconds(seconds).is_none() {
                return Err(AppError::configuration(format!(
                    "Token setting '{field}' is out of range: {seconds}"
                )));
            }
        }

        let names = [
            &self.token_type_claim,
            &self.user_id_claim,
            &self.sliding_refresh_exp_claim,
        ];
        for (i, name) in names.iter().enumerate() {
            if name.is_empty() {
                return Err(AppError::configuration("Claim names must not be empty"));
            }
            if RESERVED_CLAIMS.contains(&name.as_str()) {
                return Err(AppError::configuration(format!(
                    "Claim name '{name}' is reserved"
                )));
            }
            if names[i + 1..].contains(name) {
                return Err(AppError::configuration(format!(
                    "Claim name '{name}' is configured twice"
                )));
            }
        }

        Ok(())
    }
}

/// Out-of-range values become a zero lifetime, which token construction
/// refuses.
fn lifetime(seconds: i64) -> Duration {
    Duration::try_seconds(seconds).unwrap_or_else(Duration::zero)
}

fn default_signing_key() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_short_lifetime() -> i64 {
    5 * 60
}

fn default_long_lifetime() -> i64 {
    24 * 60 * 60
}

fn default_token_type_claim() -> String {
    "token_type".to_string()
}

fn default_user_id_claim() -> String {
    "user_id".to_string()
}

fn default_sliding_refresh_exp_claim() -> String {
    "refresh_exp".to_string()
}
