//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from an
//! optional TOML file plus `TOKENSMITH__*` environment variables. Each
//! sub-module represents a logical configuration section.

pub mod ledger;
pub mod logging;
pub mod token;

use serde::{Deserialize, Serialize};

pub use self::ledger::{LedgerConfig, RedisLedgerConfig};
pub use self::logging::LoggingConfig;
pub use self::token::TokenSettings;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Token signing, lifetimes and claim names.
    #[serde(default)]
    pub token: TokenSettings,
    /// Revocation ledger settings.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file and the environment.
    ///
    /// The file is optional; environment variables prefixed with
    /// `TOKENSMITH__` override it (e.g. `TOKENSMITH__TOKEN__SIGNING_KEY`).
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("TOKENSMITH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.token.validate()?;
        Ok(config)
    }
}
