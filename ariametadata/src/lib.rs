//! Now-playing metadata client for AriaRadio
//!
//! The station publishes a small plain-text resource describing the current
//! track: two lines, the first naming the station, the second in
//! `"<title> - <artist>"` form. This crate fetches it, parses it leniently
//! (a missing artist is normal, not an error) and offers a background
//! poller that republishes changes on a watch channel every couple of
//! seconds.
//!
//! # Example
//!
//! ```no_run
//! use ariametadata::MetadataClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = MetadataClient::new("http://radio.example.com:4002/metadata/nowplaying.txt")?;
//!     let now = client.now_playing().await?;
//!     println!("{} - {}",
//!         now.title.as_deref().unwrap_or("?"),
//!         now.artist.as_deref().unwrap_or("?"),
//!     );
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod error;
pub mod models;
pub mod poller;

// Re-exports
pub use client::{ClientBuilder, MetadataClient};
pub use error::{Error, Result};
pub use models::NowPlaying;
pub use poller::NowPlayingPoller;
