//! Error types for the metadata client

/// Result type alias for metadata operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when fetching now-playing metadata
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Metadata endpoint answered with a non-success status
    #[error("metadata endpoint returned status {0}")]
    Status(u16),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
