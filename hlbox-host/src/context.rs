//! Host context bundling the host APIs.
//!
//! The desktop shell builds one context at startup and calls through it.
//! The three APIs share configuration but no mutable state.

use std::sync::Arc;

use hlbox_core::{HostConfig, RequestOptions};
use reqwest::Response;

use crate::error::{HostError, HttpError, ProcessError};
use crate::host::{
    browser::{ExternalOpener, SystemOpener, open_browser_tab},
    http::ApiClient,
    process::{ClientRunner, JsonLineStream},
};

// ============================================================================
// Host Context
// ============================================================================

/// Access to the game client, the API and the browser.
pub struct HostContext {
    /// Runner for the game client.
    pub client: Arc<ClientRunner>,
    /// Authenticated API client.
    pub api: Arc<ApiClient>,
    /// Link opener.
    pub opener: Arc<dyn ExternalOpener>,
    /// Effective configuration.
    pub config: HostConfig,
}

impl HostContext {
    /// Creates a context with default configuration.
    pub fn new() -> Result<Self, HostError> {
        Self::builder().build()
    }

    /// Creates a context with custom configuration.
    pub fn with_config(config: HostConfig) -> Result<Self, HostError> {
        Self::builder().config(config).build()
    }

    /// Creates a builder for customizing the context.
    pub fn builder() -> HostContextBuilder {
        HostContextBuilder::new()
    }

    /// Runs the game client with `args`, streaming its JSON output.
    pub fn call<S: AsRef<str>>(&self, args: &[S]) -> Result<JsonLineStream, ProcessError> {
        self.client.call(args)
    }

    /// Sends an authenticated request to `endpoint`.
    pub async fn fetch_api(
        &self,
        api_key: &str,
        endpoint: &str,
        options: Option<&RequestOptions>,
    ) -> Result<Response, HttpError> {
        self.api.fetch(api_key, endpoint, options).await
    }

    /// Opens `url` in the default browser. Failures are only logged.
    pub fn open_browser_tab(&self, url: &str) {
        open_browser_tab(self.opener.as_ref(), url);
    }

    /// Opens a page of the public website.
    pub fn open_website(&self, path: &str) {
        self.open_browser_tab(&self.config.website_page_url(path));
    }
}

impl std::fmt::Debug for HostContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Host Context Builder
// ============================================================================

/// Builder for constructing a `HostContext`.
pub struct HostContextBuilder {
    config: HostConfig,
    opener: Option<Arc<dyn ExternalOpener>>,
}

impl HostContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config: HostConfig::default(),
            opener: None,
        }
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: HostConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the link opener.
    #[must_use]
    pub fn opener(mut self, opener: Arc<dyn ExternalOpener>) -> Self {
        self.opener = Some(opener);
        self
    }

    /// Validates the configuration and builds the context.
    pub fn build(self) -> Result<HostContext, HostError> {
        self.config.validate()?;

        Ok(HostContext {
            client: Arc::new(ClientRunner::from_config(&self.config)),
            api: Arc::new(ApiClient::from_config(&self.config)?),
            opener: self.opener.unwrap_or_else(|| Arc::new(SystemOpener::new())),
            config: self.config,
        })
    }
}

impl Default for HostContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OpenError;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct RecordingOpener {
        opened: Mutex<Vec<String>>,
    }

    impl ExternalOpener for RecordingOpener {
        fn open(&self, url: &str) -> Result<(), OpenError> {
            self.opened.lock().unwrap().push(url.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_default_context() {
        let ctx = HostContext::new().unwrap();
        assert_eq!(ctx.config, HostConfig::default());
        assert_eq!(
            ctx.api.endpoint_url("login/me"),
            "http://35.190.92.101/v1/login/me"
        );
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let config = HostConfig {
            website_url: "nope".to_string(),
            ..Default::default()
        };
        let result = HostContext::with_config(config);
        assert!(matches!(result, Err(HostError::Core(_))));
    }

    #[test]
    fn test_open_website_uses_configured_host() {
        let opener = Arc::new(RecordingOpener::default());
        let ctx = HostContext::builder()
            .opener(opener.clone())
            .build()
            .unwrap();

        ctx.open_website("play");
        ctx.open_browser_tab("https://example.com/a");

        let opened = opener.opened.lock().unwrap();
        assert_eq!(
            opened.as_slice(),
            ["http://35.241.33.112/play", "https://example.com/a"]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_call_through_context() {
        use futures::StreamExt;

        let config = HostConfig {
            interpreter: "sh".to_string(),
            client_args: vec![
                "-c".to_string(),
                r#"echo '{"status": "ok"}'"#.to_string(),
                "sh".to_string(),
            ],
            ..Default::default()
        };
        let ctx = HostContext::with_config(config).unwrap();

        let values: Vec<_> = ctx.call(&["bot"]).unwrap().collect().await;
        assert_eq!(values, vec![serde_json::json!({"status": "ok"})]);
    }
}
