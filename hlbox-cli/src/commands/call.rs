//! Call command - run the game client and print its JSON events.

use anyhow::{Context, Result, bail};
use clap::Args;
use hlbox_host::{HostContext, Slot};
use tracing::debug;

/// Arguments for the call command.
#[derive(Args, Debug, Default)]
pub struct CallArgs {
    /// Pretty-print each event.
    #[arg(long)]
    pub pretty: bool,

    /// Arguments passed to the client after the JSON flag.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Runs the call command.
pub async fn run(args: &CallArgs, ctx: &HostContext) -> Result<()> {
    let mut events = ctx
        .call(&args.args)
        .with_context(|| format!("Failed to start {}", ctx.config.interpreter))?;

    let mut count = 0usize;
    loop {
        let event = match events.next_event().await {
            Slot::Value(event) => event,
            Slot::Closed => break,
            Slot::Failed(e) => bail!("Client stream failed after {count} events: {e}"),
        };
        count += 1;
        let line = if args.pretty {
            serde_json::to_string_pretty(&event)?
        } else {
            serde_json::to_string(&event)?
        };
        println!("{line}");
    }

    debug!(events = count, "Client stream ended");
    Ok(())
}
