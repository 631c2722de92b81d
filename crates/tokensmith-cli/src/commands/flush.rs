//! Ledger cleanup command.

use crate::output;
use tokensmith::{AppConfig, AppResult, RevocationLedger, TokenIssuer};

/// Execute the flush command
pub async fn execute(config: &AppConfig) -> AppResult<()> {
    let issuer = super::create_issuer(config).await?;
    let revocation = super::require_revocation(issuer.as_ref())?;

    let now = issuer.engine().now();
    let removed = revocation.ledger().flush_expired(now).await?;
    output::print_success(&format!("Removed {removed} expired ledger entries"));
    Ok(())
}
