//! Background now-playing poller
//!
//! Fetches the now-playing resource at a fixed interval and publishes the
//! parsed result on a watch channel. Fetch errors are logged and the last
//! good value is kept; the poller never fails the UI.

use crate::client::MetadataClient;
use crate::models::NowPlaying;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default poll interval (2 seconds)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Handle to the spawned polling task.
pub struct NowPlayingPoller {
    join_handle: JoinHandle<()>,
    rx: watch::Receiver<NowPlaying>,
}

impl NowPlayingPoller {
    /// Spawn a poller. The first fetch happens immediately, then every
    /// `interval`.
    pub fn spawn(client: MetadataClient, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(NowPlaying::default());

        let join_handle = tokio::spawn(async move {
            debug!(url = %client.url(), interval_ms = interval.as_millis() as u64, "Starting now-playing poller");

            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                match client.now_playing().await {
                    Ok(now) => {
                        // only wake subscribers when the track changed
                        tx.send_if_modified(|current| {
                            if *current == now {
                                false
                            } else {
                                *current = now;
                                true
                            }
                        });
                    }
                    Err(err) => {
                        warn!(%err, "Failed to fetch now-playing metadata");
                    }
                }
            }
        });

        Self { join_handle, rx }
    }

    /// Subscribe to track updates.
    pub fn subscribe(&self) -> watch::Receiver<NowPlaying> {
        self.rx.clone()
    }

    /// Latest known track.
    pub fn current(&self) -> NowPlaying {
        self.rx.borrow().clone()
    }

    /// Stop polling.
    pub fn stop(&self) {
        self.join_handle.abort();
    }
}

impl Drop for NowPlayingPoller {
    fn drop(&mut self) {
        self.join_handle.abort();
    }
}
