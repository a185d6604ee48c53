// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `hlbox` Host
//!
//! Host APIs used by the Halite desktop shell.
//!
//! ## Host APIs
//!
//! - [`host::process`] - Run the game client and stream its JSON output
//! - [`host::http`] - Authenticated requests to the game API
//! - [`host::browser`] - Open links in the default browser
//!
//! The [`handoff`] module holds the single-slot producer/consumer adapter the
//! process streamer is built on.
//!
//! ## Example
//!
//! ```ignore
//! use futures::StreamExt;
//! use hlbox_host::HostContext;
//!
//! let ctx = HostContext::new()?;
//!
//! let mut events = ctx.call(&["bot", "-b", "MyBot.zip", "upload"])?;
//! while let Some(event) = events.next().await {
//!     println!("{event}");
//! }
//!
//! let response = ctx.fetch_api(&api_key, "login/me", None).await?;
//! ctx.open_browser_tab("http://35.241.33.112/play");
//! ```

pub mod context;
pub mod error;
pub mod handoff;
pub mod host;

// Re-export key types at crate root

// Errors
pub use error::{HostError, HttpError, OpenError, ProcessError, StreamError};

// Host APIs
pub use host::{
    browser::{ExternalOpener, SystemOpener, open_browser_tab},
    http::ApiClient,
    process::{ClientRunner, JsonLineStream},
};

// Handoff
pub use handoff::{ConsumerGone, Slot, SlotReceiver, SlotSender};

// Context
pub use context::{HostContext, HostContextBuilder};
