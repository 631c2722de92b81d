//! Access token refresh command.

use clap::Args;

use super::TokenRow;
use crate::output::{self, OutputFormat};
use tokensmith::{AppConfig, AppResult, TokenIssuer};

/// Arguments for the refresh command
#[derive(Debug, Args)]
pub struct RefreshArgs {
    /// Encoded refresh token
    pub token: String,
}

/// Execute the refresh command
pub async fn execute(args: &RefreshArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let issuer = super::create_issuer(config).await?;
    let access = issuer.refresh_access(&args.token).await?;
    output::print_list(&[TokenRow::new(&access)?], format);
    Ok(())
}
