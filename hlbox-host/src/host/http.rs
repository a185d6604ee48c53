//! Authenticated HTTP client for the game API.
//!
//! Every request goes to `<base>/<endpoint>` and carries the user's API key
//! in a fixed header. Caller options are never modified: the key is added to
//! a derived copy.

use std::time::Duration;

use hlbox_core::{HostConfig, RequestOptions};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response};
use tracing::{debug, instrument};
use url::Url;

use crate::error::HttpError;

/// User agent string for hlbox.
const USER_AGENT: &str = concat!("hlbox/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// API Client
// ============================================================================

/// HTTP client bound to the API host.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: Client,
    base_url: String,
    api_key_header: String,
}

impl ApiClient {
    /// Creates a client for `base_url`.
    ///
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(
        base_url: &str,
        api_key_header: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, HttpError> {
        Url::parse(base_url).map_err(|e| HttpError::InvalidUrl(format!("{base_url}: {e}")))?;
        HeaderName::from_bytes(api_key_header.as_bytes()).map_err(|e| {
            HttpError::InvalidHeader {
                name: api_key_header.to_string(),
                reason: e.to_string(),
            }
        })?;

        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: builder.build()?,
            base_url: base_url.to_string(),
            api_key_header: api_key_header.to_string(),
        })
    }

    /// Creates a client from host configuration.
    pub fn from_config(config: &HostConfig) -> Result<Self, HttpError> {
        Self::new(
            &config.api_base_url,
            &config.api_key_header,
            config.request_timeout(),
        )
    }

    /// URL for an endpoint. The endpoint is appended verbatim.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// Derives the options actually sent: the caller's options (or empty
    /// options) with the API key header set.
    pub fn authorize(&self, api_key: &str, options: Option<&RequestOptions>) -> RequestOptions {
        match options {
            Some(options) => options.with_header(&self.api_key_header, api_key),
            None => RequestOptions::new().with_header(&self.api_key_header, api_key),
        }
    }

    /// Builds the request without sending it.
    pub fn build_request(
        &self,
        api_key: &str,
        endpoint: &str,
        options: Option<&RequestOptions>,
    ) -> Result<RequestBuilder, HttpError> {
        let options = self.authorize(api_key, options);
        let method_name = options.method_or_default();
        let method = Method::from_bytes(method_name.as_bytes())
            .map_err(|_| HttpError::InvalidMethod(method_name.to_string()))?;

        let mut request = self
            .inner
            .request(method, self.endpoint_url(endpoint))
            .headers(header_map(&options)?);
        if let Some(body) = options.body {
            request = request.body(body);
        }
        Ok(request)
    }

    /// Sends an authenticated request.
    ///
    /// Non-success statuses are returned as ordinary responses.
    #[instrument(skip(self, api_key, options), fields(endpoint = %endpoint))]
    pub async fn fetch(
        &self,
        api_key: &str,
        endpoint: &str,
        options: Option<&RequestOptions>,
    ) -> Result<Response, HttpError> {
        let request = self.build_request(api_key, endpoint, options)?;
        debug!(
            method = options.map_or("GET", RequestOptions::method_or_default),
            "API request"
        );

        let response = request.send().await?;
        debug!(status = %response.status(), "Response received");
        Ok(response)
    }
}

/// Converts option headers into a reqwest header map.
///
/// Names differing only in case are all kept.
fn header_map(options: &RequestOptions) -> Result<HeaderMap, HttpError> {
    let mut headers = HeaderMap::with_capacity(options.headers.len());
    for (name, value) in &options.headers {
        let invalid = |reason: String| HttpError::InvalidHeader {
            name: name.clone(),
            reason,
        };
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
        let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
        headers.append(header_name, header_value);
    }
    Ok(headers)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client_for(server: &Server) -> ApiClient {
        ApiClient::new(&format!("{}/v1", server.url()), "X-Api-Key", None).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_merges_headers_without_mutating_options() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/v1/user/7/bot")
            .match_header("x-foo", "bar")
            .match_header("x-api-key", "abc")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        let client = client_for(&server);
        let options = RequestOptions::new().method("POST").header("X-Foo", "bar");
        let snapshot = options.clone();

        let response = client
            .fetch("abc", "user/7/bot", Some(&options))
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(options, snapshot);
        assert_eq!(options.headers.len(), 1);
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_without_options_sets_only_api_key() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/v1/login/me")
            .match_header("x-api-key", "abc")
            .match_header("x-foo", Matcher::Missing)
            .with_status(200)
            .with_body(r#"{"user_id": 7}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let response = client.fetch("abc", "login/me", None).await.unwrap();

        assert_eq!(response.text().await.unwrap(), r#"{"user_id": 7}"#);
        m.assert_async().await;

        let derived = client.authorize("abc", None);
        assert_eq!(derived.headers.len(), 1);
        assert_eq!(derived.headers["X-Api-Key"], "abc");
    }

    #[tokio::test]
    async fn test_fetch_overrides_caller_api_key() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/v1/leaderboard")
            .match_header("x-api-key", "abc")
            .with_status(200)
            .create_async()
            .await;

        let client = client_for(&server);
        let options = RequestOptions::new().header("x-api-key", "stale");
        client
            .fetch("abc", "leaderboard", Some(&options))
            .await
            .unwrap();

        assert_eq!(options.headers["x-api-key"], "stale");
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_returns_error_status_as_response() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/v1/missing")
            .with_status(404)
            .create_async()
            .await;

        let client = client_for(&server);
        let response = client.fetch("abc", "missing", None).await.unwrap();
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn test_fetch_sends_body() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("PUT", "/v1/user/7")
            .match_body(r#"{"username":"bot"}"#)
            .with_status(204)
            .create_async()
            .await;

        let client = client_for(&server);
        let options = RequestOptions::new()
            .method("PUT")
            .body(r#"{"username":"bot"}"#);
        let response = client.fetch("abc", "user/7", Some(&options)).await.unwrap();

        assert_eq!(response.status(), 204);
        m.assert_async().await;
    }

    #[test]
    fn test_injected_header_does_not_bleed() {
        let client = ApiClient::new("http://localhost/v1", "X-Api-Key", None).unwrap();
        let shared = RequestOptions::new().method("POST");

        let first = client.authorize("one", Some(&shared));
        let second = client.authorize("two", Some(&shared));
        let fresh = client.authorize("three", Some(&RequestOptions::new()));

        assert!(shared.headers.is_empty());
        assert_eq!(first.headers["X-Api-Key"], "one");
        assert_eq!(second.headers["X-Api-Key"], "two");
        assert_eq!(fresh.headers.len(), 1);
        assert_eq!(fresh.headers["X-Api-Key"], "three");
        assert!(fresh.method.is_none());
    }

    #[test]
    fn test_headers_differing_in_case_are_both_sent() {
        let client = ApiClient::new("http://localhost/v1", "X-Api-Key", None).unwrap();
        let options = RequestOptions::new()
            .header("X-Foo", "upper")
            .header("x-foo", "lower");

        let request = client
            .build_request("abc", "x", Some(&options))
            .unwrap()
            .build()
            .unwrap();

        let values: Vec<_> = request
            .headers()
            .get_all("x-foo")
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(values, vec!["upper", "lower"]);
        assert_eq!(request.headers()["x-api-key"], "abc");
    }

    #[test]
    fn test_endpoint_url() {
        let client = ApiClient::from_config(&HostConfig::default()).unwrap();
        assert_eq!(
            client.endpoint_url("user/42"),
            "http://35.190.92.101/v1/user/42"
        );
    }

    #[test]
    fn test_invalid_method() {
        let client = ApiClient::new("http://localhost/v1", "X-Api-Key", None).unwrap();
        let options = RequestOptions::new().method("NOT A METHOD");
        let result = client.build_request("abc", "x", Some(&options));
        assert!(matches!(result, Err(HttpError::InvalidMethod(_))));
    }

    #[test]
    fn test_invalid_header_value() {
        let client = ApiClient::new("http://localhost/v1", "X-Api-Key", None).unwrap();
        let options = RequestOptions::new().header("X-Foo", "bad\nvalue");
        let result = client.build_request("abc", "x", Some(&options));
        assert!(matches!(result, Err(HttpError::InvalidHeader { .. })));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = ApiClient::new("not-a-valid-url", "X-Api-Key", None);
        assert!(matches!(result, Err(HttpError::InvalidUrl(_))));
    }
}
