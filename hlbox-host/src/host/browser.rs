//! Opening links in the user's default browser.

use std::fmt::Debug;

use tracing::{debug, warn};

use crate::error::OpenError;

// ============================================================================
// Opener Trait
// ============================================================================

/// Hands a URL to the desktop's default handler.
pub trait ExternalOpener: Send + Sync + Debug {
    /// Opens `url`. No validation is done here.
    fn open(&self, url: &str) -> Result<(), OpenError>;
}

/// Opener backed by the operating system's default browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemOpener;

impl SystemOpener {
    /// Creates a new system opener.
    pub fn new() -> Self {
        Self
    }
}

impl ExternalOpener for SystemOpener {
    fn open(&self, url: &str) -> Result<(), OpenError> {
        webbrowser::open(url).map_err(|e| OpenError::Launch {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Opens a URL in a browser tab, fire-and-forget.
///
/// Failures are logged and otherwise ignored.
pub fn open_browser_tab(opener: &dyn ExternalOpener, url: &str) {
    debug!(url = %url, "Opening URL");
    if let Err(e) = opener.open(url) {
        warn!(error = %e, "Failed to open URL");
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
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

    #[derive(Debug)]
    struct FailingOpener;

    impl ExternalOpener for FailingOpener {
        fn open(&self, url: &str) -> Result<(), OpenError> {
            Err(OpenError::Launch {
                url: url.to_string(),
                reason: "no browser".to_string(),
            })
        }
    }

    #[test]
    fn test_open_browser_tab_passes_url_once() {
        let opener = RecordingOpener::default();
        let url = "http://35.241.33.112/play?x=1&y= 2";

        open_browser_tab(&opener, url);

        let opened = opener.opened.lock().unwrap();
        assert_eq!(opened.as_slice(), [url.to_string()]);
    }

    #[test]
    fn test_open_browser_tab_does_not_validate() {
        let opener = RecordingOpener::default();
        open_browser_tab(&opener, "not a url");
        assert_eq!(opener.opened.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_open_browser_tab_swallows_failure() {
        open_browser_tab(&FailingOpener, "http://example.com");
    }

    #[test]
    fn test_open_error_display() {
        let err = FailingOpener.open("http://example.com").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("http://example.com"));
        assert!(msg.contains("no browser"));
    }
}
