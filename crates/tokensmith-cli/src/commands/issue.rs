//! Token issuance command.

use clap::Args;

use super::TokenRow;
use crate::output::{self, OutputFormat};
use tokensmith::{AppConfig, AppResult, TokenIssuer, TokenKind, UserId};

/// Arguments for the issue command
#[derive(Debug, Args)]
pub struct IssueArgs {
    /// User the token is issued for; all-digit ids are kept numeric
    #[arg(short, long)]
    pub user: String,

    /// Token kind: access, refresh or sliding
    #[arg(short, long, default_value_t = TokenKind::Access)]
    pub kind: TokenKind,

    /// Issue a refresh token together with its derived access token
    #[arg(long, conflicts_with = "kind")]
    pub pair: bool,
}

/// Execute the issue command
pub async fn execute(args: &IssueArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let issuer = super::create_issuer(config).await?;
    let user = UserId::parse(&args.user);

    if args.pair {
        let pair = issuer.pair_for_user(&user).await?;
        match format {
            OutputFormat::Json => output::print_json(&pair),
            OutputFormat::Table => {
                output::print_kv("access_token", &pair.access_token);
                output::print_kv("access_expires_at", &pair.access_expires_at.to_rfc3339());
                output::print_kv("refresh_token", &pair.refresh_token);
                output::print_kv("refresh_expires_at", &pair.refresh_expires_at.to_rfc3339());
            }
        }
        return Ok(());
    }

    let token = issuer.for_user(args.kind, &user).await?;
    output::print_list(&[TokenRow::new(&token)?], format);
    Ok(())
}
