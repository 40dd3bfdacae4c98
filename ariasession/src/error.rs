//! Error types for the playback session

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur inside the playback session.
///
/// None of these ever reach the UI layer: the controller absorbs every
/// failure and surfaces it only as status-flag changes. The variants exist
/// so stream-handle implementations can report what went wrong when a
/// request could not even be issued.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The connection/negotiation never succeeded
    #[error("stream load failed: {0}")]
    LoadFailure(String),

    /// The stream negotiated but playback start was rejected
    #[error("playback start rejected: {0}")]
    PlayFailure(String),

    /// The underlying handle failed to accept a request
    #[error("stream handle error: {0}")]
    Handle(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create a handle error
    pub fn handle(msg: impl Into<String>) -> Self {
        Self::Handle(msg.into())
    }
}
