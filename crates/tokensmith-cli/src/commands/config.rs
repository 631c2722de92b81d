//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use tokensmith::{AppConfig, AppResult};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration, signing key masked
    Show,
    /// Validate the configuration and summarize it
    Validate,
}

/// Execute config commands
pub fn execute(
    args: &ConfigArgs,
    config: &AppConfig,
    config_path: &str,
    format: OutputFormat,
) -> AppResult<()> {
    match &args.command {
        ConfigCommand::Show => {
            let mut shown = config.clone();
            shown.token.signing_key = "****".to_string();
            shown.ledger.redis.url = shown.ledger.redis.masked_url();
            match format {
                OutputFormat::Json => output::print_json(&shown),
                OutputFormat::Table => println!("{shown:#?}"),
            }
        }
        ConfigCommand::Validate => {
            // Loading already validated the token settings.
            output::print_success(&format!("Configuration '{config_path}' is valid"));
            output::print_kv("Algorithm", &config.token.algorithm);
            output::print_kv(
                "Lifetimes (s)",
                &format!(
                    "access {} / refresh {} / sliding {} (renewable {})",
                    config.token.access_lifetime_seconds,
                    config.token.refresh_lifetime_seconds,
                    config.token.sliding_lifetime_seconds,
                    config.token.sliding_refresh_lifetime_seconds,
                ),
            );
            let ledger = if config.ledger.enabled {
                config.ledger.provider.as_str()
            } else {
                "disabled"
            };
            output::print_kv("Revocation ledger", ledger);
            if config.ledger.enabled && config.ledger.provider == "redis" {
                output::print_kv("Redis", &config.ledger.redis.masked_url());
            }
        }
    }

    Ok(())
}
