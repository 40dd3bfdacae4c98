//! Stream handle abstraction
//!
//! The session controller never talks to a decoder directly; it drives a
//! [`StreamHandle`] obtained from a [`StreamFactory`]. The handle owns one
//! network audio connection and reports its lifecycle asynchronously as
//! [`StreamEvent`]s on the channel supplied at open time.
//!
//! Opening a handle issues the initial connect+play request (autoplay
//! semantics): a freshly opened handle is already negotiating and will
//! answer with `Loaded`/`Started` or `LoadFailed`.

use crate::error::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Audio codec hints passed to the stream handle.
///
/// The upstream endpoint serves one stream but clients advertise the
/// encodings they accept as fallbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Aac,
}

impl AudioFormat {
    /// Short format name as used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Aac => "aac",
        }
    }

    /// MIME type for HTTP `Accept` negotiation
    pub fn mime(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Aac => "audio/aac",
        }
    }

    /// Parse a short format name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mp3" => Some(AudioFormat::Mp3),
            "aac" => Some(AudioFormat::Aac),
            _ => None,
        }
    }
}

/// Description of the stream to open: URL plus codec fallback hints.
#[derive(Debug, Clone)]
pub struct StreamSpec {
    pub url: String,
    pub formats: Vec<AudioFormat>,
}

impl StreamSpec {
    /// Spec for `url` with the default mp3/aac fallback hints
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            formats: vec![AudioFormat::Mp3, AudioFormat::Aac],
        }
    }

    /// `Accept` header value built from the format hints
    pub fn accept_header(&self) -> String {
        if self.formats.is_empty() {
            return "audio/*".to_string();
        }
        self.formats
            .iter()
            .map(|f| f.mime())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Asynchronous events emitted by a stream handle.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// Connection/negotiation succeeded
    Loaded,
    /// Connection/negotiation never succeeded
    LoadFailed { reason: String },
    /// Audio is flowing
    Started,
    /// Negotiated but playback start was rejected
    PlayFailed { reason: String },
    /// Playback paused at the handle level
    Paused,
    /// The stream terminated after playing
    Ended,
}

/// Owner of one network audio connection.
///
/// At most one handle exists per session at any instant; the controller is
/// its exclusive owner. Terminal outcomes of `play()` arrive as events, not
/// as return values: the `Result` here only reports failure to *issue* the
/// request.
#[async_trait]
pub trait StreamHandle: Send {
    /// Issue a play request. The outcome (`Started`, `LoadFailed` or
    /// `PlayFailed`) is delivered on the event channel.
    async fn play(&mut self) -> Result<()>;

    /// Request pause. Emits `Paused` once the handle has stopped.
    async fn pause(&mut self) -> Result<()>;

    /// True while audio is actually flowing.
    fn is_active(&self) -> bool;

    /// Release the connection. Must be idempotent.
    async fn close(&mut self);
}

/// Factory for stream handles, injected into the session controller.
///
/// `open` must not block: implementations spawn their own IO tasks and
/// report progress through `events`.
pub trait StreamFactory: Send + Sync {
    fn open(&self, spec: &StreamSpec, events: mpsc::Sender<StreamEvent>) -> Box<dyn StreamHandle>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!(AudioFormat::parse("mp3"), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::parse(" AAC "), Some(AudioFormat::Aac));
        assert_eq!(AudioFormat::parse("flac"), None);
        assert_eq!(AudioFormat::parse(""), None);
    }

    #[test]
    fn test_accept_header() {
        let spec = StreamSpec::new("http://radio.example.com/stream");
        assert_eq!(spec.accept_header(), "audio/mpeg, audio/aac");

        let bare = StreamSpec {
            url: "http://radio.example.com/stream".into(),
            formats: vec![],
        };
        assert_eq!(bare.accept_header(), "audio/*");
    }
}
