//! Host error types.

use thiserror::Error;

// ============================================================================
// Main Host Error
// ============================================================================

/// Error building a host context.
#[derive(Debug, Error)]
pub enum HostError {
    /// Core error.
    #[error("Core error: {0}")]
    Core(#[from] hlbox_core::CoreError),

    /// HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),
}

// ============================================================================
// Process Error
// ============================================================================

/// Error type for starting the client process.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Command not found.
    #[error("Command not found: {0}")]
    NotFound(String),

    /// The process could not be spawned.
    #[error("Failed to spawn {cmd}: {source}")]
    Spawn {
        /// Command that failed to start.
        cmd: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// Stdout was not captured.
    #[error("Process stdout is not available")]
    MissingStdout,
}

// ============================================================================
// Stream Error
// ============================================================================

/// Error ending a JSON line stream early.
#[derive(Debug, Error)]
pub enum StreamError {
    /// A line was not valid JSON.
    #[error("Invalid JSON line {line:?}: {source}")]
    Parse {
        /// The offending line.
        line: String,
        /// Parser error.
        source: serde_json::Error,
    },

    /// Reading stdout failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// HTTP Error
// ============================================================================

/// HTTP-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request error.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid HTTP method.
    #[error("Invalid method: {0}")]
    InvalidMethod(String),

    /// Invalid header name or value.
    #[error("Invalid header {name}: {reason}")]
    InvalidHeader {
        /// Header name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
}

// ============================================================================
// Open Error
// ============================================================================

/// Error type for the external link opener.
#[derive(Debug, Error)]
pub enum OpenError {
    /// The default handler could not be launched.
    #[error("Failed to open {url}: {reason}")]
    Launch {
        /// URL that was passed to the handler.
        url: String,
        /// Reported failure.
        reason: String,
    },
}
