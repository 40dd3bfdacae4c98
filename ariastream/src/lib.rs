//! HTTP/Icecast stream handle for AriaRadio
//!
//! Production implementation of the `ariasession` stream-handle seam: one
//! outbound HTTP connection to a fixed Icecast-style endpoint, read as an
//! infinite byte stream. The handle translates the HTTP lifecycle into the
//! session's event model:
//!
//! - connect error or non-success status → `LoadFailed`
//! - successful response → `Loaded`
//! - first audio bytes → `Started`
//! - stream end or read error after start → `Ended`
//! - sink refusing to start → `PlayFailed`
//!
//! Decoding and device output stay external: received bytes are forwarded
//! to an [`AudioSink`], which is the seam where a real decoder plugs in.

pub mod error;
pub mod icecast;
pub mod sink;

// Re-exports
pub use error::{Error, Result};
pub use icecast::{IcecastFactory, IcecastHandle};
pub use sink::{AudioSink, DiscardSink};
