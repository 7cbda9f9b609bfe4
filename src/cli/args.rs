//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    completions::CompletionsArgs,
    methods::MethodsCommands,
    payments::PaymentsCommands,
    resource::{GetArgs, ListArgs},
};

#[derive(Parser, Debug)]
#[command(name = "mollie")]
#[command(author, version, about = "Browse payments and payment methods on the Mollie API")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Mollie API key (test_/live_) or access token (access_)
    #[arg(long, short = 'k', global = true, env = "MOLLIE_API_KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Enable testmode when using an access token
    #[arg(long, short = 't', global = true, env = "MOLLIE_TESTMODE")]
    pub testmode: bool,

    /// Output format (default: table)
    #[arg(long, short = 'f', global = true, env = "MOLLIE_FORMAT", ignore_case = true)]
    pub format: Option<OutputFormat>,

    /// Suppress warnings
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Log requests and show full error diagnostics
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// API base URL
    #[arg(long, global = true, env = "MOLLIE_API_URL", hide = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Payments
    #[command(subcommand)]
    Payments(PaymentsCommands),

    /// Payment methods
    #[command(subcommand)]
    Methods(MethodsCommands),

    /// List items of any resource by (partial) name
    List(ListArgs),

    /// Retrieve a single item by resource ID
    Get(GetArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned text table
    #[default]
    Table,
    /// Markdown table
    Md,
    /// CSV (for spreadsheets)
    Csv,
    /// JSON
    Json,
    /// YAML
    Yaml,
    /// Just IDs, one per line
    Id,
}

impl OutputFormat {
    /// Pick the effective format: flag or env, then config, then table
    pub fn resolve(flag: Option<OutputFormat>, config_default: Option<&str>) -> OutputFormat {
        if let Some(format) = flag {
            return format;
        }
        match config_default.map(|name| OutputFormat::from_str(name, true)) {
            Some(Ok(format)) => format,
            Some(Err(_)) => {
                log::warn!(
                    "unknown default_format '{}' in config, using table",
                    config_default.unwrap_or_default()
                );
                OutputFormat::Table
            }
            None => OutputFormat::Table,
        }
    }
}
