//! Playback session state machine for AriaRadio
//!
//! This crate owns the single logical playback session of the application:
//! it creates at most one stream handle, tracks whether audio is actually
//! flowing, detects stream death and retries at a fixed interval until audio
//! resumes. All of that is reconciled into one small state machine driven by
//! three independently-evolving inputs:
//!
//! - user commands (`play` / `pause`),
//! - asynchronous load/play/error events from the streaming decoder,
//! - a time-based reconnect tick.
//!
//! The controller runs as a single-owner worker task: every transition is
//! processed serially inside one `tokio::select!` loop, so the transition
//! table needs no locks. Consumers only ever see the read-only
//! [`StatusSnapshot`] published on a watch channel, plus the shared
//! [`LoadingSignal`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use ariasession::{LoadingSignal, SessionController, StreamSpec};
//! # use ariasession::StreamFactory;
//! # fn factory() -> Arc<dyn StreamFactory> { unimplemented!() }
//!
//! #[tokio::main]
//! async fn main() {
//!     let loading = LoadingSignal::new();
//!     let spec = StreamSpec::new("http://radio.example.com:8000/stream");
//!     let (controller, _task) =
//!         SessionController::spawn(spec, factory(), loading, Duration::from_secs(1));
//!
//!     controller.play().await;
//!     let status = controller.snapshot();
//!     println!("loading: {}", status.is_loading);
//! }
//! ```

pub mod controller;
pub mod error;
pub mod handle;
pub mod loading;
pub mod status;

// Re-exports
pub use controller::{SessionCommand, SessionController, SessionTask};
pub use error::{Error, Result};
pub use handle::{AudioFormat, StreamEvent, StreamFactory, StreamHandle, StreamSpec};
pub use loading::LoadingSignal;
pub use status::StatusSnapshot;
