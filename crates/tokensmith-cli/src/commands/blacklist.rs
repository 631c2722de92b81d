//! Token revocation command.

use clap::Args;

use crate::output;
use tokensmith::{AppConfig, AppError, AppResult, RevocationAware, TokenIssuer, TokenKind, UserId};

/// Arguments for the blacklist command
#[derive(Debug, Args)]
pub struct BlacklistArgs {
    /// Encoded refresh or sliding token
    #[arg(required_unless_present = "user", conflicts_with = "user")]
    pub token: Option<String>,

    /// Kind of the given token
    #[arg(short, long, default_value_t = TokenKind::Refresh)]
    pub kind: TokenKind,

    /// Blacklist every outstanding token of this user instead
    #[arg(short, long)]
    pub user: Option<String>,
}

/// Execute the blacklist command
pub async fn execute(args: &BlacklistArgs, config: &AppConfig) -> AppResult<()> {
    let issuer = super::create_issuer(config).await?;
    let revocation = super::require_revocation(issuer.as_ref())?;
    super::warn_if_ephemeral(config);

    if let Some(user) = &args.user {
        let user = UserId::parse(user);
        let count = revocation.revoke_user(&user).await?;
        output::print_success(&format!("Blacklisted {count} token(s) of user '{user}'"));
        return Ok(());
    }

    let encoded = args
        .token
        .as_deref()
        .ok_or_else(|| AppError::validation("A token or --user is required"))?;

    // Verified without the blacklist check so re-blacklisting reports cleanly.
    let token = issuer.engine().decode(args.kind, encoded)?;
    let jti = token.jti().unwrap_or_default().to_string();

    if revocation.blacklist(&token).await? {
        output::print_success(&format!("Token '{jti}' blacklisted"));
    } else {
        output::print_warning(&format!("Token '{jti}' was already blacklisted"));
    }
    Ok(())
}
