//! Client error types.

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be sent or no response was received.
    #[error("connection error: {0}")]
    Connection(#[source] reqwest::Error),

    /// Server responded with an error status.
    #[error("HTTP error: {status} - {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// A streaming response was not an event stream.
    #[error("expected Content-Type to contain 'text/event-stream', got {}", content_type.as_deref().unwrap_or("<none>"))]
    UnexpectedContentType {
        /// The Content-Type header the server sent, if any.
        content_type: Option<String>,
    },

    /// An open event stream failed mid-read.
    #[error("stream interrupted: {0}")]
    StreamInterrupted(String),

    /// The stream was cancelled before the server responded.
    #[error("stream cancelled before a response was received")]
    Cancelled,

    /// Streaming was requested with a method the transport does not issue.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// Reading or decoding a response body failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A run finished with an error payload.
    #[error("run failed: {0}")]
    RunFailed(String),
}

impl Error {
    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self.status(), Some(status) if status >= 500)
    }

    /// Check if the request never reached the server.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection(_))
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;
