//! Open command - open a link in the default browser.

use anyhow::Result;
use clap::Args;
use hlbox_host::HostContext;

/// Arguments for the open command.
#[derive(Args, Debug)]
pub struct OpenArgs {
    /// URL to open, or a website path with `--website`.
    pub target: String,

    /// Treat the target as a path on the public website.
    #[arg(long, short)]
    pub website: bool,
}

/// Runs the open command.
#[allow(clippy::unnecessary_wraps)]
pub fn run(args: &OpenArgs, ctx: &HostContext) -> Result<()> {
    if args.website {
        ctx.open_website(&args.target);
    } else {
        ctx.open_browser_tab(&args.target);
    }
    Ok(())
}
