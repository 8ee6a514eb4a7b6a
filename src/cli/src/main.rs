//! CareLink CLI - Command-line interface for the CareLink dashboard backend.
//!
//! Provides commands for previewing role-filtered navigation, checking
//! route access, and inspecting server health.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{check, health, nav};
use output::OutputFormat;

/// CareLink - healthcare administration platform CLI
#[derive(Parser)]
#[command(
    name = "carelink",
    version = "0.1.0",
    about = "CareLink - healthcare administration platform CLI",
    long_about = "CLI tool for previewing role-filtered navigation, checking route access, and inspecting the CareLink server.",
    propagate_version = true
)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "table")]
    output: OutputFormat,

    /// API server URL
    #[arg(long, global = true, env = "CARELINK_API_URL")]
    api_url: Option<String>,

    /// Bearer token for authenticated requests
    #[arg(long, global = true, env = "CARELINK_TOKEN")]
    token: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview the navigation entries visible to a given subject
    Nav(nav::NavArgs),

    /// Evaluate the route guard for a given subject and requirement
    Check(check::CheckArgs),

    /// Check server health
    Health(health::HealthArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let api_url = cli
        .api_url
        .clone()
        .unwrap_or_else(|| "http://localhost:8080".to_string());

    let client = client::ApiClient::new(&api_url, cli.token.as_deref())?;
    let format = cli.output;

    let result = match cli.command {
        Commands::Nav(args) => nav::execute(args, format),
        Commands::Check(args) => check::execute(args, format),
        Commands::Health(args) => health::execute(args, &client, format).await,
    };

    if let Err(e) = result {
        output::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
