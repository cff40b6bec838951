//! Spendscope CLI - Procurement insight engine
//!
//! Usage:
//!   spendscope analyze --file sheet.csv     Analyze a procurement sheet
//!   spendscope rules                        List the rule registry
//!   spendscope serve --port 3000            Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Analyze {
            file,
            format,
            core_only,
        } => commands::cmd_analyze(&file, format, core_only),
        Commands::Rules => commands::cmd_rules(),
        Commands::Serve {
            port,
            host,
            config,
            allow_origin,
        } => commands::cmd_serve(host, port, config.as_deref(), allow_origin).await,
    }
}
