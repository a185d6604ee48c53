//! Host APIs for the desktop shell.
//!
//! - [`process`] - Streaming execution of the game client
//! - [`http`] - Authenticated requests to the game API
//! - [`browser`] - Opening links in the default browser

pub mod browser;
pub mod http;
pub mod process;

// Re-export key types
pub use browser::{ExternalOpener, SystemOpener, open_browser_tab};
pub use http::ApiClient;
pub use process::{ClientRunner, JsonLineStream};
