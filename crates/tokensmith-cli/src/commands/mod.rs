//! CLI command definitions and dispatch.

pub mod blacklist;
pub mod config;
pub mod flush;
pub mod issue;
pub mod outstanding;
pub mod refresh;
pub mod renew;
pub mod verify;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use crate::output::OutputFormat;
use tokensmith::{AppConfig, AppError, AppResult, RevocationAware, Token, TokenIssuer};

/// Tokensmith: signed authorization tokens for stateless sessions
#[derive(Debug, Parser)]
#[command(name = "tokensmith", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (extension optional)
    #[arg(short, long, default_value = "config/default")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Issue a token for a user
    Issue(issue::IssueArgs),
    /// Verify a token and print its claims
    Verify(verify::VerifyArgs),
    /// Derive a new access token from a refresh token
    Refresh(refresh::RefreshArgs),
    /// Renew a sliding token
    Renew(renew::RenewArgs),
    /// Blacklist a token or every outstanding token of a user
    Blacklist(blacklist::BlacklistArgs),
    /// List the outstanding tokens of a user
    Outstanding(outstanding::OutstandingArgs),
    /// Remove expired entries from the revocation ledger
    Flush,
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> AppResult<()> {
        debug!(config = %self.config, "Executing command");
        match &self.command {
            Commands::Issue(args) => issue::execute(args, &config, self.format).await,
            Commands::Verify(args) => verify::execute(args, &config, self.format).await,
            Commands::Refresh(args) => refresh::execute(args, &config, self.format).await,
            Commands::Renew(args) => renew::execute(args, &config, self.format).await,
            Commands::Blacklist(args) => blacklist::execute(args, &config).await,
            Commands::Outstanding(args) => {
                outstanding::execute(args, &config, self.format).await
            }
            Commands::Flush => flush::execute(&config).await,
            Commands::Config(args) => config::execute(args, &config, &self.config, self.format),
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> AppResult<AppConfig> {
    AppConfig::load(config_path)
}

/// Helper: build the configured issuer
pub async fn create_issuer(config: &AppConfig) -> AppResult<Arc<dyn TokenIssuer>> {
    tokensmith::issuer_from_config(config).await
}

/// Helper: the revocation capability, or an error telling the operator how to
/// enable it
pub fn require_revocation(issuer: &dyn TokenIssuer) -> AppResult<&dyn RevocationAware> {
    issuer.revocation().ok_or_else(|| {
        AppError::configuration(
            "Revocation ledger is disabled. Set ledger.enabled = true to use this command",
        )
    })
}

/// Helper: the in-memory ledger lives only as long as this process
pub fn warn_if_ephemeral(config: &AppConfig) {
    if config.ledger.provider == "memory" {
        crate::output::print_warning(
            "The in-memory ledger is discarded when this command exits; use the redis provider to persist revocations",
        );
    }
}

/// Token display row
#[derive(Debug, Serialize, Tabled)]
pub struct TokenRow {
    /// Token kind
    kind: String,
    /// Token ID
    jti: String,
    /// Expires
    expires_at: String,
    /// Signed token
    token: String,
}

impl TokenRow {
    /// Sign `token` and describe it.
    pub fn new(token: &Token) -> AppResult<Self> {
        Ok(Self {
            kind: token.kind().to_string(),
            jti: token.jti().unwrap_or_default().to_string(),
            expires_at: token
                .expires_at()
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
            token: token.encode()?,
        })
    }
}
