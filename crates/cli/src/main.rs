mod cli;
mod commands;
mod prompt;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();

    match cli.command {
        cli::Commands::Convert {
            input,
            output,
            account_name,
            config,
        } => commands::convert(&input, &output, &account_name, config.as_deref()),
        cli::Commands::UpdateConfig {
            input,
            config,
            owner_name,
        } => commands::update_config(&input, &config, owner_name.as_deref()),
    }
}
