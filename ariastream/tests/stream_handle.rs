//! Integration tests for the Icecast stream handle

use ariasession::{StreamEvent, StreamFactory, StreamHandle, StreamSpec};
use ariastream::{DiscardSink, IcecastFactory};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn factory_with_sink() -> (IcecastFactory, Arc<DiscardSink>) {
    let sink = Arc::new(DiscardSink::new());
    let factory = IcecastFactory::new(reqwest::Client::new(), sink.clone());
    (factory, sink)
}

async fn next_event(rx: &mut mpsc::Receiver<StreamEvent>) -> StreamEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for stream event")
        .expect("event channel closed")
}

#[tokio::test]
async fn test_successful_stream_emits_loaded_started_ended() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stream"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/mpeg")
                .insert_header("icy-name", "Test Station")
                .set_body_bytes(vec![0xAAu8; 4096]),
        )
        .mount(&mock_server)
        .await;

    let (factory, sink) = factory_with_sink();
    let (tx, mut rx) = mpsc::channel(16);
    let spec = StreamSpec::new(format!("{}/stream", mock_server.uri()));
    let mut handle = factory.open(&spec, tx);

    assert!(matches!(next_event(&mut rx).await, StreamEvent::Loaded));
    assert!(matches!(next_event(&mut rx).await, StreamEvent::Started));
    // finite body: upstream closes, which counts as an unexpected end
    assert!(matches!(next_event(&mut rx).await, StreamEvent::Ended));

    assert!(!handle.is_active());
    assert_eq!(sink.bytes_written(), 4096);
    handle.close().await;
}

#[tokio::test]
async fn test_error_status_emits_load_failed() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stream"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let (factory, _sink) = factory_with_sink();
    let (tx, mut rx) = mpsc::channel(16);
    let spec = StreamSpec::new(format!("{}/stream", mock_server.uri()));
    let mut handle = factory.open(&spec, tx);

    match next_event(&mut rx).await {
        StreamEvent::LoadFailed { reason } => assert!(reason.contains("404")),
        other => panic!("expected LoadFailed, got {other:?}"),
    }
    assert!(!handle.is_active());
    handle.close().await;
}

#[tokio::test]
async fn test_unreachable_endpoint_emits_load_failed() {
    let (factory, _sink) = factory_with_sink();
    let (tx, mut rx) = mpsc::channel(16);
    // nothing listens here
    let spec = StreamSpec::new("http://127.0.0.1:9/stream");
    let mut handle = factory.open(&spec, tx);

    assert!(matches!(
        next_event(&mut rx).await,
        StreamEvent::LoadFailed { .. }
    ));
    handle.close().await;
}

#[tokio::test]
async fn test_pause_emits_paused_and_deactivates() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stream"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/mpeg")
                // large body with a trickle delay keeps the connection open
                // long enough to pause mid-stream
                .set_body_bytes(vec![0xAAu8; 1 << 20])
                .set_delay(Duration::from_millis(50)),
        )
        .mount(&mock_server)
        .await;

    let (factory, _sink) = factory_with_sink();
    let (tx, mut rx) = mpsc::channel(16);
    let spec = StreamSpec::new(format!("{}/stream", mock_server.uri()));
    let mut handle = factory.open(&spec, tx);

    assert!(matches!(next_event(&mut rx).await, StreamEvent::Loaded));

    handle.pause().await.unwrap();
    assert!(!handle.is_active());

    // a Paused transition must arrive; Started/Ended may race in before it
    let mut saw_paused = false;
    for _ in 0..4 {
        match next_event(&mut rx).await {
            StreamEvent::Paused => {
                saw_paused = true;
                break;
            }
            StreamEvent::Started | StreamEvent::Ended => continue,
            other => panic!("unexpected event {other:?}"),
        }
    }
    assert!(saw_paused);
    handle.close().await;
}

#[tokio::test]
async fn test_play_after_pause_reconnects() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stream"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "audio/mpeg")
                .set_body_bytes(vec![0xAAu8; 1024]),
        )
        .mount(&mock_server)
        .await;

    let (factory, _sink) = factory_with_sink();
    let (tx, mut rx) = mpsc::channel(32);
    let spec = StreamSpec::new(format!("{}/stream", mock_server.uri()));
    let mut handle = factory.open(&spec, tx);

    assert!(matches!(next_event(&mut rx).await, StreamEvent::Loaded));
    handle.pause().await.unwrap();

    // drain until the Paused transition
    loop {
        if matches!(next_event(&mut rx).await, StreamEvent::Paused) {
            break;
        }
    }

    // a new play request opens a fresh connection on the same handle
    handle.play().await.unwrap();
    assert!(matches!(next_event(&mut rx).await, StreamEvent::Loaded));
    handle.close().await;
}
