// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `hlbox` Core
//!
//! Configuration and request types shared by the `hlbox` crates.
//!
//! - [`HostConfig`] - Where the game client lives and which hosts to talk to
//! - [`RequestOptions`] - Caller-supplied HTTP request configuration
//! - [`CoreError`] - Configuration loading and validation errors

pub mod config;
pub mod error;
pub mod request;

pub use config::{HostConfig, ParseFailurePolicy, default_config_dir, default_config_path};
pub use error::CoreError;
pub use request::RequestOptions;
