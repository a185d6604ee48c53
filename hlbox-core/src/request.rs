//! Caller-supplied HTTP request options.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// HTTP request configuration passed to the authenticated fetcher.
///
/// The fetcher never modifies a caller's `RequestOptions`; it derives a new
/// value with [`RequestOptions::with_header`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    /// HTTP method. `None` means `GET`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Request headers.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    /// Request body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl RequestOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the method.
    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Returns a copy of these options with `name` set to `value`.
    ///
    /// Any existing header with the same name, compared case-insensitively,
    /// is replaced. `self` is left untouched.
    pub fn with_header(&self, name: &str, value: &str) -> Self {
        let mut headers: BTreeMap<String, String> = self
            .headers
            .iter()
            .filter(|(k, _)| !k.eq_ignore_ascii_case(name))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        headers.insert(name.to_string(), value.to_string());

        Self {
            method: self.method.clone(),
            headers,
            body: self.body.clone(),
        }
    }

    /// Effective HTTP method.
    pub fn method_or_default(&self) -> &str {
        self.method.as_deref().unwrap_or("GET")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_header_leaves_original_untouched() {
        let original = RequestOptions::new().method("POST").header("X-Foo", "bar");
        let snapshot = original.clone();

        let derived = original.with_header("X-Api-Key", "abc");

        assert_eq!(original, snapshot);
        assert_eq!(derived.headers.len(), 2);
        assert_eq!(derived.headers["X-Foo"], "bar");
        assert_eq!(derived.headers["X-Api-Key"], "abc");
        assert_eq!(derived.method.as_deref(), Some("POST"));
    }

    #[test]
    fn test_with_header_overrides_case_insensitively() {
        let original = RequestOptions::new().header("x-api-key", "spoofed");
        let derived = original.with_header("X-Api-Key", "abc");

        assert_eq!(derived.headers.len(), 1);
        assert_eq!(derived.headers["X-Api-Key"], "abc");
        assert_eq!(original.headers["x-api-key"], "spoofed");
    }

    #[test]
    fn test_method_defaults_to_get() {
        assert_eq!(RequestOptions::new().method_or_default(), "GET");
        assert_eq!(RequestOptions::new().method("PUT").method_or_default(), "PUT");
    }

    #[test]
    fn test_deserialize_partial() {
        let options: RequestOptions =
            serde_json::from_str(r#"{"method": "POST", "headers": {"X-Foo": "bar"}}"#).unwrap();
        assert_eq!(options.method.as_deref(), Some("POST"));
        assert_eq!(options.headers["X-Foo"], "bar");
        assert!(options.body.is_none());
    }
}
