//! Config command - inspect configuration.

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};
use hlbox_core::default_config_path;
use hlbox_host::HostContext;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration (default).
    Show,

    /// Show the configuration file path.
    Path,
}

/// Runs the config command.
pub fn run(args: &ConfigArgs, ctx: &HostContext, config_path: Option<&Path>) -> Result<()> {
    match args.action {
        None | Some(ConfigAction::Show) => {
            println!("{}", serde_json::to_string_pretty(&ctx.config)?);
        }
        Some(ConfigAction::Path) => {
            let path = config_path.map_or_else(default_config_path, Path::to_path_buf);
            let state = if path.exists() { "" } else { " (not found, using defaults)" };
            println!("{}{state}", path.display());
        }
    }
    Ok(())
}
