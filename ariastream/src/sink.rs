//! Audio sink seam
//!
//! The stream handle does not decode audio: it pumps raw encoded bytes into
//! an [`AudioSink`]. A real deployment plugs a decoder/output chain in
//! here; [`DiscardSink`] drops the bytes and only keeps a counter, which is
//! enough for headless operation and for tests.

use crate::error::Result;
use std::sync::atomic::{AtomicU64, Ordering};

/// Consumer of the raw encoded byte stream.
///
/// Implementations must be cheap and non-blocking: `write` is called from
/// the stream reader task for every received chunk.
pub trait AudioSink: Send + Sync {
    /// Start (or resume) consuming audio. Returning an error means playback
    /// cannot start; the handle surfaces it as `PlayFailed`.
    fn resume(&self) -> Result<()>;

    /// Stop consuming audio.
    fn pause(&self);

    /// One chunk of encoded audio bytes.
    fn write(&self, chunk: &[u8]);
}

/// Sink that discards audio bytes, counting them.
#[derive(Debug, Default)]
pub struct DiscardSink {
    bytes_written: AtomicU64,
}

impl DiscardSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total bytes received since creation.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written.load(Ordering::Relaxed)
    }
}

impl AudioSink for DiscardSink {
    fn resume(&self) -> Result<()> {
        Ok(())
    }

    fn pause(&self) {}

    fn write(&self, chunk: &[u8]) {
        self.bytes_written
            .fetch_add(chunk.len() as u64, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discard_sink_counts_bytes() {
        let sink = DiscardSink::new();
        assert_eq!(sink.bytes_written(), 0);

        sink.write(&[0u8; 128]);
        sink.write(&[0u8; 72]);
        assert_eq!(sink.bytes_written(), 200);

        assert!(sink.resume().is_ok());
        sink.pause();
    }
}
