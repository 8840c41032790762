use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ezbook-convert")]
#[command(about = "Convert K&H Bank exports to ezBookkeeping format", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a K&H TSV export to an ezBookkeeping CSV
    Convert {
        /// Input K&H TSV file path
        #[arg(long)]
        input: PathBuf,

        /// Output ezBookkeeping CSV file path
        #[arg(long)]
        output: PathBuf,

        /// Account name to stamp on every transaction
        #[arg(long)]
        account_name: String,

        /// Categorization config file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate an LLM review prompt for uncategorized partners
    UpdateConfig {
        /// Input K&H TSV file path
        #[arg(long)]
        input: PathBuf,

        /// Categorization config file (TOML)
        #[arg(long, default_value = "categories.toml")]
        config: PathBuf,

        /// Account owner's name, redacted from the prompt if it appears
        #[arg(long)]
        owner_name: Option<String>,
    },
}
