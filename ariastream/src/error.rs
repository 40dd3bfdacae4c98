//! Error types for the stream handle

/// Result type alias for stream operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur inside the HTTP stream handle.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("upstream returned status {0}")]
    UpstreamStatus(u16),

    /// The audio sink rejected playback
    #[error("audio sink rejected playback: {0}")]
    Sink(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a sink error
    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink(msg.into())
    }

    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
