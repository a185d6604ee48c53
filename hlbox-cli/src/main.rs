// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! hlbox CLI - drive the desktop host APIs from a terminal.
//!
//! # Examples
//!
//! ```bash
//! # Stream the game client's JSON events
//! hlbox call -- bot -b MyBot.zip upload
//!
//! # Open a page of the website
//! hlbox open --website play-programming-challenge
//!
//! # Authenticated API request
//! hlbox fetch --api-key $KEY login/me --pretty
//!
//! # Show effective configuration
//! hlbox config
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hlbox_core::HostConfig;
use hlbox_host::HostContext;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{call, config, fetch, open};

// ============================================================================
// CLI Definition
// ============================================================================

/// hlbox CLI - host shim for the Halite desktop client.
#[derive(Parser)]
#[command(name = "hlbox")]
#[command(about = "Host shim for the Halite desktop client")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to the per-user config directory).
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (no logging).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run the game client and print its JSON events.
    Call(call::CallArgs),

    /// Open a URL in the default browser.
    Open(open::OpenArgs),

    /// Send an authenticated API request.
    Fetch(fetch::FetchArgs),

    /// Inspect configuration.
    Config(config::ConfigArgs),
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("hlbox=debug,hlbox_host=debug,hlbox_core=debug,info")
    } else {
        EnvFilter::new("hlbox=warn,hlbox_host=warn,hlbox_core=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let host_config = match &cli.config {
        Some(path) => HostConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => HostConfig::load_default()?,
    };
    let ctx = HostContext::with_config(host_config)?;

    let result = match &cli.command {
        Commands::Call(args) => call::run(args, &ctx).await,
        Commands::Open(args) => open::run(args, &ctx),
        Commands::Fetch(args) => fetch::run(args, &ctx).await,
        Commands::Config(args) => config::run(args, &ctx, cli.config.as_deref()),
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }

    Ok(())
}
