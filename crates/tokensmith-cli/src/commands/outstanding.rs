//! Outstanding token listing command.

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use tokensmith::{AppConfig, AppResult, RevocationLedger, UserId};

/// Arguments for the outstanding command
#[derive(Debug, Args)]
pub struct OutstandingArgs {
    /// User whose tokens to list
    pub user: String,
}

/// Outstanding token display row
#[derive(Debug, Serialize, Tabled)]
struct OutstandingRow {
    /// Token ID
    jti: String,
    /// Issued
    issued_at: String,
    /// Expires
    expires_at: String,
    /// Blacklisted
    blacklisted: String,
}

/// Execute the outstanding command
pub async fn execute(
    args: &OutstandingArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> AppResult<()> {
    let issuer = super::create_issuer(config).await?;
    let revocation = super::require_revocation(issuer.as_ref())?;
    super::warn_if_ephemeral(config);

    let ledger = revocation.ledger();
    let user = UserId::parse(&args.user);

    let mut rows = Vec::new();
    for token in ledger.outstanding_for_user(&user).await? {
        let blacklisted = ledger.is_blacklisted(&token.jti).await?;
        rows.push(OutstandingRow {
            jti: token.jti,
            issued_at: token.issued_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            expires_at: token.expires_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            blacklisted: if blacklisted { "✓" } else { "✗" }.to_string(),
        });
    }

    output::print_list(&rows, format);
    Ok(())
}
