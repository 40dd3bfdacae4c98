//! Icecast-style HTTP stream handle
//!
//! One handle owns one network audio connection. The connection itself is a
//! plain HTTP GET kept open forever; audio is "flowing" while chunks keep
//! arriving on the response body. A background reader task performs the
//! request and forwards bytes to the sink, reporting lifecycle transitions
//! on the session event channel.

use crate::error::Error;
use crate::sink::AudioSink;
use ariasession::{StreamEvent, StreamFactory, StreamHandle, StreamSpec};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Factory producing [`IcecastHandle`]s bound to a shared HTTP client and
/// audio sink.
pub struct IcecastFactory {
    client: Client,
    sink: Arc<dyn AudioSink>,
}

impl IcecastFactory {
    pub fn new(client: Client, sink: Arc<dyn AudioSink>) -> Self {
        Self { client, sink }
    }
}

impl StreamFactory for IcecastFactory {
    fn open(&self, spec: &StreamSpec, events: mpsc::Sender<StreamEvent>) -> Box<dyn StreamHandle> {
        let mut handle = IcecastHandle::new(
            self.client.clone(),
            spec.clone(),
            Arc::clone(&self.sink),
            events,
        );
        // Opening issues the initial connect+play request.
        handle.spawn_reader();
        Box::new(handle)
    }
}

/// Owner of one live connection to the streaming endpoint.
pub struct IcecastHandle {
    client: Client,
    spec: StreamSpec,
    sink: Arc<dyn AudioSink>,
    events: mpsc::Sender<StreamEvent>,
    /// True while bytes are flowing
    active: Arc<AtomicBool>,
    /// Set before aborting the reader so its tail events are suppressed
    suppress: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
}

impl IcecastHandle {
    fn new(
        client: Client,
        spec: StreamSpec,
        sink: Arc<dyn AudioSink>,
        events: mpsc::Sender<StreamEvent>,
    ) -> Self {
        Self {
            client,
            spec,
            sink,
            events,
            active: Arc::new(AtomicBool::new(false)),
            suppress: Arc::new(AtomicBool::new(false)),
            reader: None,
        }
    }

    fn reader_running(&self) -> bool {
        self.reader.as_ref().is_some_and(|j| !j.is_finished())
    }

    fn spawn_reader(&mut self) {
        if self.reader_running() {
            return;
        }
        self.suppress.store(false, Ordering::SeqCst);
        self.reader = Some(tokio::spawn(run_stream(
            self.client.clone(),
            self.spec.clone(),
            Arc::clone(&self.sink),
            self.events.clone(),
            Arc::clone(&self.active),
            Arc::clone(&self.suppress),
        )));
    }

    fn stop_reader(&mut self) {
        self.suppress.store(true, Ordering::SeqCst);
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        self.active.store(false, Ordering::SeqCst);
        self.sink.pause();
    }
}

#[async_trait]
impl StreamHandle for IcecastHandle {
    async fn play(&mut self) -> ariasession::Result<()> {
        self.spawn_reader();
        Ok(())
    }

    async fn pause(&mut self) -> ariasession::Result<()> {
        self.stop_reader();
        let _ = self.events.send(StreamEvent::Paused).await;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    async fn close(&mut self) {
        self.stop_reader();
    }
}

impl Drop for IcecastHandle {
    fn drop(&mut self) {
        // The reader must never outlive its handle.
        self.suppress.store(true, Ordering::SeqCst);
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }
}

/// Connect, then pump bytes until the stream dies.
async fn run_stream(
    client: Client,
    spec: StreamSpec,
    sink: Arc<dyn AudioSink>,
    events: mpsc::Sender<StreamEvent>,
    active: Arc<AtomicBool>,
    suppress: Arc<AtomicBool>,
) {
    debug!(url = %spec.url, accept = %spec.accept_header(), "Connecting to stream");

    let response = match client
        .get(&spec.url)
        .header(ACCEPT, spec.accept_header())
        .send()
        .await
    {
        Ok(response) => response,
        Err(err) => {
            let _ = events
                .send(StreamEvent::LoadFailed {
                    reason: err.to_string(),
                })
                .await;
            return;
        }
    };

    if !response.status().is_success() {
        let err = Error::UpstreamStatus(response.status().as_u16());
        let _ = events
            .send(StreamEvent::LoadFailed {
                reason: err.to_string(),
            })
            .await;
        return;
    }

    // Icecast/Shoutcast servers announce themselves in icy headers.
    if let Some(name) = response
        .headers()
        .get("icy-name")
        .and_then(|v| v.to_str().ok())
    {
        debug!(station = %name, "Connected to stream");
    }

    let _ = events.send(StreamEvent::Loaded).await;

    if let Err(err) = sink.resume() {
        let _ = events
            .send(StreamEvent::PlayFailed {
                reason: err.to_string(),
            })
            .await;
        return;
    }

    let mut body = response.bytes_stream();
    let mut started = false;

    loop {
        match body.next().await {
            Some(Ok(chunk)) => {
                if chunk.is_empty() {
                    continue;
                }
                if !started {
                    started = true;
                    active.store(true, Ordering::SeqCst);
                    let _ = events.send(StreamEvent::Started).await;
                }
                sink.write(&chunk);
            }
            Some(Err(err)) => {
                warn!(%err, url = %spec.url, "Stream read error");
                break;
            }
            None => {
                debug!(url = %spec.url, "Stream closed by upstream");
                break;
            }
        }
    }

    active.store(false, Ordering::SeqCst);
    sink.pause();

    // A deliberate pause/close already reported its own transition.
    if suppress.load(Ordering::SeqCst) {
        return;
    }

    if started {
        let _ = events.send(StreamEvent::Ended).await;
    } else {
        let _ = events
            .send(StreamEvent::LoadFailed {
                reason: "stream closed before any audio arrived".to_string(),
            })
            .await;
    }
}
