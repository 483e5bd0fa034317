//! LangGraph CLI
//!
//! Main entry point for the `langgraph` command-line client.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{health, join, runs, stream, threads};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// LangGraph - command-line client for LangGraph servers
#[derive(Parser)]
#[command(name = "langgraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// Server URL (default: http://localhost:8123)
    #[arg(long, global = true, env = "LANGGRAPH_URL")]
    pub url: Option<String>,

    /// API key sent as x-api-key
    #[arg(long, global = true, env = "LANGGRAPH_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Client config file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit one event per stream line instead of per frame
    #[arg(long, global = true)]
    pub eager: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a run and stream its output
    Stream(stream::StreamArgs),

    /// Stream output from a run already in progress
    Join(join::JoinArgs),

    /// Manage runs
    Runs(runs::RunsArgs),

    /// Manage threads
    Threads(threads::ThreadsArgs),

    /// Check that the server is reachable
    Health(health::HealthArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only command output
    let filter = if cli.verbose {
        "langgraph=debug,langgraph_client=debug,warn"
    } else {
        "langgraph=info,langgraph_client=warn,warn"
    };

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
                ),
        )
        .init();

    let ctx = commands::Context::from_cli(&cli)?;

    // Dispatch to command handlers
    match cli.command {
        Commands::Stream(args) => stream::run(args, &ctx).await,
        Commands::Join(args) => join::run(args, &ctx).await,
        Commands::Runs(args) => runs::run(args, &ctx).await,
        Commands::Threads(args) => threads::run(args, &ctx).await,
        Commands::Health(args) => health::run(args, &ctx).await,
    }
}
