//! AriaRadio — internet-radio playback client
//!
//! Wires the pieces together: configuration, the playback session worker
//! with its HTTP stream handle, the now-playing poller, and the local HTTP
//! command/status surface any UI can sit on.

mod routes;

use ariametadata::{MetadataClient, NowPlayingPoller};
use ariasession::{AudioFormat, LoadingSignal, SessionController, StreamSpec};
use ariastream::{AudioSink, DiscardSink, IcecastFactory};
use routes::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USER_AGENT: &str = "AriaRadio/0.1";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ariaconfig::get_config();
    info!("🎧 Starting AriaRadio...");

    // ========== Playback session ==========

    let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
    let sink: Arc<dyn AudioSink> = Arc::new(DiscardSink::new());
    let factory = Arc::new(IcecastFactory::new(http.clone(), sink));

    let mut spec = StreamSpec::new(config.get_stream_url());
    let formats: Vec<AudioFormat> = config
        .get_stream_formats()
        .iter()
        .filter_map(|name| AudioFormat::parse(name))
        .collect();
    if !formats.is_empty() {
        spec.formats = formats;
    }

    let loading = LoadingSignal::new();
    let retry_interval = Duration::from_millis(config.get_retry_interval_ms());
    let (controller, session_task) =
        SessionController::spawn(spec, factory, loading.clone(), retry_interval);

    // ========== Now-playing poller ==========

    let metadata_client = MetadataClient::with_client(http, config.get_metadata_url());
    let poller = NowPlayingPoller::spawn(
        metadata_client,
        Duration::from_millis(config.get_metadata_poll_ms()),
    );

    // ========== HTTP surface ==========

    let state = AppState::new(controller.clone(), loading, poller.subscribe());
    let app = routes::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.get_http_port()));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🌐 Listening on http://{addr}");
    info!("✅ AriaRadio is ready, press Ctrl+C to stop");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down...");
    poller.stop();
    controller.shutdown().await;
    session_task.wait().await?;
    info!("✅ AriaRadio stopped");

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
