//! CLI argument definitions using clap
//!
//! The command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Spendscope - Find savings in procurement spend
#[derive(Parser)]
#[command(name = "spendscope")]
#[command(about = "Rule-based procurement insight engine", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a procurement sheet (CSV)
    Analyze {
        /// CSV file to analyze
        #[arg(short, long)]
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Validate only the core columns and print findings without savings views
        #[arg(long)]
        core_only: bool,
    },

    /// List registered rules in execution order
    Rules,

    /// Start the web server
    Serve {
        /// Port to listen on (overrides settings file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides settings file)
        #[arg(long)]
        host: Option<String>,

        /// Settings file (defaults to ~/.local/share/spendscope/config/server.toml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Allowed CORS origin; repeat for several, `*` allows any
        #[arg(long = "allow-origin")]
        allow_origin: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
