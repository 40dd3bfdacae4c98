//! Session controller
//!
//! The controller reconciles user commands, asynchronous stream-handle
//! events and the reconnect tick into one race-free state machine. It runs
//! as a single worker task that exclusively owns the mutable session state
//! (the stream handle included), in the same spirit as the background
//! workers elsewhere in this workspace: commands arrive on an mpsc channel,
//! handle events on another, and the retry timer is a third select arm that
//! only exists while armed.
//!
//! Because every transition is processed serially inside that loop, the
//! state machine needs no locks; the outside world only sees the
//! [`StatusSnapshot`] watch channel and the shared [`LoadingSignal`].
//!
//! Failure policy:
//! - `LoadFailed` is hard but recoverable: mark the stream dead and retry
//!   at a fixed interval, indefinitely.
//! - `Ended` after successful playback also retries indefinitely.
//! - `PlayFailed` is soft: no automatic retry, a new explicit `play()` is
//!   required (it usually reflects a transient start rejection, not a dead
//!   upstream).
//! - Commands after teardown are absorbed as no-ops, never errors.

use crate::handle::{StreamEvent, StreamFactory, StreamHandle, StreamSpec};
use crate::loading::LoadingSignal;
use crate::status::StatusSnapshot;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval};
use tracing::{debug, info, warn};

/// Commands sent to the session worker.
#[derive(Debug)]
pub enum SessionCommand {
    Play,
    Pause,
    Shutdown,
}

/// Public handle to the session worker.
///
/// Cloneable; all clones drive the same session. Commands are
/// fire-and-forget: effects are observed only through [`Self::status`].
#[derive(Clone)]
pub struct SessionController {
    commands: mpsc::Sender<SessionCommand>,
    status: watch::Receiver<StatusSnapshot>,
}

/// Handle to the spawned worker task.
pub struct SessionTask {
    join_handle: JoinHandle<()>,
}

impl SessionTask {
    /// Wait for the worker to stop.
    pub async fn wait(self) -> std::result::Result<(), tokio::task::JoinError> {
        match self.join_handle.await {
            Err(err) if err.is_cancelled() => {
                warn!("Session worker task cancelled: {err}");
                Ok(())
            }
            other => other,
        }
    }
}

impl SessionController {
    /// Spawn the session worker.
    ///
    /// `factory` provides stream handles on demand, `loading` is the shared
    /// loading indicator the controller writes, `retry_interval` is the
    /// fixed reconnect period (no backoff, no cap).
    pub fn spawn(
        spec: StreamSpec,
        factory: Arc<dyn StreamFactory>,
        loading: LoadingSignal,
        retry_interval: Duration,
    ) -> (Self, SessionTask) {
        let (commands_tx, mut commands_rx) = mpsc::channel(32);
        let (events_tx, mut events_rx) = mpsc::channel(32);
        let (status_tx, status_rx) = watch::channel(StatusSnapshot::default());

        let join_handle = tokio::spawn(async move {
            info!(url = %spec.url, "Starting playback session worker");

            let mut worker = SessionWorker::new(spec, factory, loading, status_tx, events_tx);
            let mut retry: Option<Interval> = None;

            loop {
                // Keep the armed interval in sync with the state machine.
                // At most one timer exists at any instant.
                match (&retry, worker.retry_armed) {
                    (None, true) => {
                        let first = Instant::now() + retry_interval;
                        retry = Some(tokio::time::interval_at(first, retry_interval));
                    }
                    (Some(_), false) => retry = None,
                    _ => {}
                }

                tokio::select! {
                    cmd = commands_rx.recv() => match cmd {
                        Some(cmd) => {
                            worker.handle_command(cmd).await;
                            if worker.shutdown {
                                break;
                            }
                        }
                        // Every controller clone dropped: release resources.
                        None => {
                            worker.teardown().await;
                            break;
                        }
                    },
                    Some(event) = events_rx.recv() => {
                        worker.on_stream_event(event).await;
                    }
                    _ = retry_tick(&mut retry) => {
                        worker.on_retry_tick().await;
                    }
                }
            }

            info!("Playback session worker stopped");
        });

        (
            Self {
                commands: commands_tx,
                status: status_rx,
            },
            SessionTask { join_handle },
        )
    }

    /// Request playback. No-op while already connecting or playing, and
    /// no-op after teardown.
    pub async fn play(&self) {
        let _ = self.commands.send(SessionCommand::Play).await;
    }

    /// Request pause. No-op without a handle and after teardown.
    pub async fn pause(&self) {
        let _ = self.commands.send(SessionCommand::Pause).await;
    }

    /// Tear the session down: disarm the timer, release the handle. Safe to
    /// call any number of times.
    pub async fn shutdown(&self) {
        let _ = self.commands.send(SessionCommand::Shutdown).await;
    }

    /// Subscribe to status updates.
    pub fn status(&self) -> watch::Receiver<StatusSnapshot> {
        self.status.clone()
    }

    /// Current status snapshot.
    pub fn snapshot(&self) -> StatusSnapshot {
        *self.status.borrow()
    }
}

/// One tick of the armed retry timer; pends forever while disarmed.
async fn retry_tick(retry: &mut Option<Interval>) {
    match retry {
        Some(interval) => {
            interval.tick().await;
        }
        None => futures::future::pending::<()>().await,
    }
}

/// Exclusive owner of the mutable session state.
///
/// One instance, owned by the worker task; every method here is one entry
/// point of the transition table, invoked serially.
struct SessionWorker {
    spec: StreamSpec,
    factory: Arc<dyn StreamFactory>,
    loading: LoadingSignal,
    status_tx: watch::Sender<StatusSnapshot>,
    events_tx: mpsc::Sender<StreamEvent>,

    /// Zero-or-one owned stream handle
    handle: Option<Box<dyn StreamHandle>>,
    /// True from issuing a play request until its terminal outcome; the
    /// sole guard against overlapping play requests
    pending_play: bool,
    is_playing: bool,
    is_reconnecting: bool,
    is_stream_dead: bool,
    /// Retry timer request; the worker loop owns the actual interval
    retry_armed: bool,
    shutdown: bool,
}

impl SessionWorker {
    fn new(
        spec: StreamSpec,
        factory: Arc<dyn StreamFactory>,
        loading: LoadingSignal,
        status_tx: watch::Sender<StatusSnapshot>,
        events_tx: mpsc::Sender<StreamEvent>,
    ) -> Self {
        Self {
            spec,
            factory,
            loading,
            status_tx,
            events_tx,
            handle: None,
            pending_play: false,
            is_playing: false,
            is_reconnecting: false,
            is_stream_dead: false,
            retry_armed: false,
            shutdown: false,
        }
    }

    async fn handle_command(&mut self, cmd: SessionCommand) {
        debug!(?cmd, "Session command");

        match cmd {
            SessionCommand::Play => self.command_play().await,
            SessionCommand::Pause => self.command_pause().await,
            SessionCommand::Shutdown => {
                self.teardown().await;
                self.shutdown = true;
            }
        }
    }

    /// `play()` command. Creates the handle lazily; opening issues the
    /// initial connect+play request.
    async fn command_play(&mut self) {
        if self.handle.is_none() {
            info!(url = %self.spec.url, "Opening stream handle");
            self.pending_play = true;
            self.is_stream_dead = false;
            self.loading.set(true);
            let handle = self.factory.open(&self.spec, self.events_tx.clone());
            self.handle = Some(handle);
            self.publish();
            return;
        }

        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        if handle.is_active() || self.pending_play {
            debug!("Already playing or pending playback, ignoring play command");
            return;
        }

        self.pending_play = true;
        self.is_stream_dead = false;
        self.loading.set(true);
        if let Err(err) = handle.play().await {
            warn!(%err, "Failed to issue play request");
            self.pending_play = false;
            self.loading.set(false);
        }
        self.publish();
    }

    /// `pause()` command. Clears the pending guard so an in-flight attempt
    /// no longer counts as outstanding user intent.
    async fn command_pause(&mut self) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };

        self.pending_play = false;
        if let Err(err) = handle.pause().await {
            warn!(%err, "Failed to issue pause request");
        }
        self.publish();
    }

    async fn on_stream_event(&mut self, event: StreamEvent) {
        debug!(?event, "Stream event");

        match event {
            StreamEvent::Loaded | StreamEvent::Started => {
                self.pending_play = false;
                self.disarm_retry();
                self.loading.set(false);
                self.is_playing = true;
                self.is_stream_dead = false;
            }
            StreamEvent::LoadFailed { reason } => {
                warn!(%reason, "Stream load failed, scheduling reconnect");
                self.pending_play = false;
                self.is_playing = false;
                self.is_stream_dead = true;
                self.loading.set(false);
                self.arm_retry();
            }
            StreamEvent::PlayFailed { reason } => {
                warn!(%reason, "Playback start rejected");
                self.pending_play = false;
                self.is_playing = false;
                self.loading.set(false);
            }
            StreamEvent::Paused => {
                self.is_playing = false;
            }
            StreamEvent::Ended => {
                info!("Stream ended, scheduling reconnect");
                self.pending_play = false;
                self.is_playing = false;
                self.arm_retry();
            }
        }
        self.publish();
    }

    /// One firing of the retry timer. Skipped while the handle is active or
    /// a play request is still in flight.
    async fn on_retry_tick(&mut self) {
        let Some(handle) = self.handle.as_mut() else {
            return;
        };
        if handle.is_active() || self.pending_play {
            return;
        }

        info!("Attempting to reconnect");
        self.pending_play = true;
        self.loading.set(true);
        if let Err(err) = handle.play().await {
            warn!(%err, "Failed to issue reconnect play request");
            self.pending_play = false;
            self.loading.set(false);
        }
        self.publish();
    }

    /// Release all resources and clear all flags. Idempotent; safe even if
    /// nothing was ever initialized.
    async fn teardown(&mut self) {
        debug!("Tearing down playback session");

        self.disarm_retry();
        self.pending_play = false;
        self.is_playing = false;
        self.is_stream_dead = false;
        if let Some(mut handle) = self.handle.take() {
            handle.close().await;
        }
        self.loading.set(false);
        self.publish();
    }

    fn arm_retry(&mut self) {
        if self.retry_armed {
            return;
        }
        self.retry_armed = true;
        self.is_reconnecting = true;
    }

    fn disarm_retry(&mut self) {
        self.retry_armed = false;
        self.is_reconnecting = false;
    }

    fn publish(&self) {
        self.status_tx.send_replace(StatusSnapshot {
            is_playing: self.is_playing,
            is_loading: self.loading.get(),
            is_reconnecting: self.is_reconnecting,
            is_stream_dead: self.is_stream_dead,
        });
    }
}
