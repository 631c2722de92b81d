//! Token verification command.

use clap::Args;

use crate::output::{self, OutputFormat};
use tokensmith::{AppConfig, AppResult, TokenIssuer, TokenKind};

/// Arguments for the verify command
#[derive(Debug, Args)]
pub struct VerifyArgs {
    /// Encoded token
    pub token: String,

    /// Expected token kind
    #[arg(short, long, default_value_t = TokenKind::Access)]
    pub kind: TokenKind,
}

/// Execute the verify command
pub async fn execute(args: &VerifyArgs, config: &AppConfig, format: OutputFormat) -> AppResult<()> {
    let issuer = super::create_issuer(config).await?;
    let token = issuer.decode(args.kind, &args.token).await?;
    let payload = token.payload();

    match format {
        OutputFormat::Json => output::print_json(&payload),
        OutputFormat::Table => {
            output::print_success(&format!("Valid {} token", token.kind()));
            for (claim, value) in &payload {
                output::print_kv(claim, &value.to_string());
            }
        }
    }
    Ok(())
}
