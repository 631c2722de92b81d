//! Sliding token renewal command.

use clap::Args;

use super::TokenRow;
use crate::output::{self, OutputFormat};
use tokensmith::{AppConfig, AppResult, TokenIssuer};

/// Arguments for the renew command
#[derive(Debug, Args)]
pub struct RenewArgs {
    /// Encoded sliding token
    pub token: String,
}

/// Execute the renew command
pub async fn execute(args: &RenewArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let issuer = super::create_issuer(config).await?;
    let renewed = issuer.renew_sliding(&args.token).await?;
    output::print_list(&[TokenRow::new(&renewed)?], format);
    Ok(())
}
