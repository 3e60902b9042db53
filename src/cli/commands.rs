//! CLI commands and argument parsing

use crate::types::IntegrationKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Connect third-party integrations and browse their data
#[derive(Parser, Debug)]
#[command(name = "integration-hub")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides config and environment)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// User id (defaults to the one stored with the credentials)
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Organization id (defaults to the one stored with the credentials)
    #[arg(short, long, global = true)]
    pub org: Option<String>,

    /// Params file holding the current integration and its credentials
    #[arg(short, long, global = true)]
    pub params_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List supported integrations
    Integrations,

    /// Authorize an integration and store its credentials
    Connect {
        /// Integration name (notion, airtable, hubspot)
        integration: IntegrationKind,
    },

    /// Disconnect the stored integration
    Disconnect,

    /// Show the stored connection state
    Status,

    /// Load items from the connected integration
    Load {
        /// Integration to load from (defaults to the stored one)
        #[arg(short, long)]
        integration: Option<IntegrationKind>,

        /// Number of pages to load (0 = until exhausted)
        #[arg(long, default_value = "1")]
        pages: usize,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Table,
    /// Pretty-printed JSON
    Json,
}
