//! CLI command implementations.

pub mod call;
pub mod config;
pub mod fetch;
pub mod open;
