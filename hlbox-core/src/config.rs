//! Host configuration.
//!
//! Every field has a default matching the released desktop client, so a
//! missing file at the default path is not an error. A path the user names
//! explicitly must exist.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::CoreError;

/// Interpreter used to run the game client.
pub const DEFAULT_INTERPRETER: &str = "python";

/// Public API host.
pub const DEFAULT_API_BASE_URL: &str = "http://35.190.92.101/v1";

/// Public website host.
pub const DEFAULT_WEBSITE_URL: &str = "http://35.241.33.112";

/// Header carrying the user's API key.
pub const DEFAULT_API_KEY_HEADER: &str = "X-Api-Key";

/// Flag asking the client for line-delimited JSON output.
pub const DEFAULT_JSON_FLAG: &str = "--json";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the default configuration directory.
///
/// - macOS: `~/Library/Application Support/hlbox`
/// - Linux: `~/.config/hlbox`
/// - Windows: `%APPDATA%\hlbox`
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|c| c.join("hlbox"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the default config file path.
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.json")
}

// ============================================================================
// Parse Failure Policy
// ============================================================================

/// What the process streamer does with a line that is not valid JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseFailurePolicy {
    /// Log the error and end the stream.
    #[default]
    Terminate,
    /// Log a warning and keep reading.
    Skip,
}

// ============================================================================
// Host Config
// ============================================================================

/// Configuration for the process streamer, fetcher and link opener.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Interpreter binary, resolved on `PATH`.
    pub interpreter: String,

    /// Arguments selecting the client module, placed before the JSON flag.
    pub client_args: Vec<String>,

    /// Flag requesting JSON output, placed before the caller's arguments.
    pub json_flag: String,

    /// Base URL for API requests. Requests go to `<base>/<endpoint>`.
    pub api_base_url: String,

    /// Base URL of the public website.
    pub website_url: String,

    /// Name of the header carrying the API key.
    pub api_key_header: String,

    /// Request timeout in seconds. Zero disables the timeout.
    pub request_timeout_secs: u64,

    /// Handling of stdout lines that fail to parse.
    pub parse_failure: ParseFailurePolicy,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            client_args: vec!["-m".to_string(), "hlt_client".to_string()],
            json_flag: DEFAULT_JSON_FLAG.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            website_url: DEFAULT_WEBSITE_URL.to_string(),
            api_key_header: DEFAULT_API_KEY_HEADER.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            parse_failure: ParseFailurePolicy::Terminate,
        }
    }
}

impl HostConfig {
    /// Loads configuration from the default path, falling back to defaults
    /// if the file does not exist.
    pub fn load_default() -> Result<Self, CoreError> {
        Self::load_or_default(&default_config_path())
    }

    /// Loads configuration from `path`, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Loads configuration from `path`. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;

        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Checks that the configuration can be used.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.interpreter.trim().is_empty() {
            return Err(CoreError::InvalidConfig("interpreter is empty".to_string()));
        }
        if self.api_key_header.trim().is_empty() {
            return Err(CoreError::InvalidConfig(
                "api_key_header is empty".to_string(),
            ));
        }
        for (name, value) in [
            ("api_base_url", &self.api_base_url),
            ("website_url", &self.website_url),
        ] {
            Url::parse(value)
                .map_err(|e| CoreError::InvalidConfig(format!("{name}: {e}")))?;
        }
        Ok(())
    }

    /// Full argument list for the client: module selector, JSON flag, then
    /// the caller's arguments.
    pub fn client_command_args<S: AsRef<str>>(&self, args: &[S]) -> Vec<String> {
        self.client_args
            .iter()
            .cloned()
            .chain(std::iter::once(self.json_flag.clone()))
            .chain(args.iter().map(|a| a.as_ref().to_string()))
            .collect()
    }

    /// URL for a page on the public website.
    pub fn website_page_url(&self, path: &str) -> String {
        format!("{}/{}", self.website_url, path.trim_start_matches('/'))
    }

    /// Request timeout, if any.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

// ============================================================================
// Tests
// ============================================================================
