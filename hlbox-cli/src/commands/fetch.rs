//! Fetch command - send an authenticated API request.

use anyhow::{Result, bail};
use clap::Args;
use hlbox_core::RequestOptions;
use hlbox_host::HostContext;

/// Arguments for the fetch command.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Endpoint path, appended to the API base URL.
    pub endpoint: String,

    /// API key sent in the API key header.
    #[arg(long, short = 'k')]
    pub api_key: String,

    /// HTTP method.
    #[arg(long, short = 'X')]
    pub method: Option<String>,

    /// Extra header as `Name: value`. May be repeated.
    #[arg(long = "header", short = 'H')]
    pub headers: Vec<String>,

    /// Request body.
    #[arg(long, short = 'd')]
    pub body: Option<String>,

    /// Pretty-print JSON response bodies.
    #[arg(long)]
    pub pretty: bool,
}

impl FetchArgs {
    /// Builds request options from the command line. Returns `None` when no
    /// option was given.
    fn request_options(&self) -> Result<Option<RequestOptions>> {
        if self.method.is_none() && self.headers.is_empty() && self.body.is_none() {
            return Ok(None);
        }

        let mut options = RequestOptions::new();
        options.method.clone_from(&self.method);
        options.body.clone_from(&self.body);
        for raw in &self.headers {
            let (name, value) = parse_header(raw)?;
            options = options.header(name, value);
        }
        Ok(Some(options))
    }
}

/// Runs the fetch command.
pub async fn run(args: &FetchArgs, ctx: &HostContext) -> Result<()> {
    let options = args.request_options()?;
    let response = ctx
        .fetch_api(&args.api_key, &args.endpoint, options.as_ref())
        .await?;

    let status = response.status();
    let body = response.text().await?;

    eprintln!("HTTP {status}");
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(value) if args.pretty => println!("{}", serde_json::to_string_pretty(&value)?),
        _ => println!("{body}"),
    }
    Ok(())
}

/// Splits `Name: value` into its parts.
fn parse_header(raw: &str) -> Result<(&str, &str)> {
    let Some((name, value)) = raw.split_once(':') else {
        bail!("Invalid header {raw:?}, expected `Name: value`");
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("Invalid header {raw:?}, name is empty");
    }
    Ok((name, value.trim()))
}
