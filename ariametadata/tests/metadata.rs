//! Integration tests for ariametadata

use ariametadata::{Error, MetadataClient, NowPlayingPoller};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(mock_server: &MockServer) -> MetadataClient {
    MetadataClient::new(format!("{}/metadata/nowplaying.txt", mock_server.uri()))
        .expect("client builds")
}

#[tokio::test]
async fn test_now_playing_fetch_and_parse() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metadata/nowplaying.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("StationName\nMidnight City - M83"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let now = client.now_playing().await.unwrap();

    assert_eq!(now.station.as_deref(), Some("StationName"));
    assert_eq!(now.title.as_deref(), Some("Midnight City"));
    assert_eq!(now.artist.as_deref(), Some("M83"));
}

#[tokio::test]
async fn test_now_playing_without_artist() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metadata/nowplaying.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("StationName\nAmbient Set"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let now = client.now_playing().await.unwrap();

    assert_eq!(now.title.as_deref(), Some("Ambient Set"));
    assert_eq!(now.artist, None);
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metadata/nowplaying.txt"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    match client.now_playing().await {
        Err(Error::Status(code)) => assert_eq!(code, 503),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_poller_publishes_track_changes() {
    let mock_server = MockServer::start().await;
    // first answer, then a different track
    Mock::given(method("GET"))
        .and(path("/metadata/nowplaying.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("StationName\nMidnight City - M83"),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/metadata/nowplaying.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("StationName\nWait - M83"),
        )
        .mount(&mock_server)
        .await;

    let poller = NowPlayingPoller::spawn(client_for(&mock_server), Duration::from_millis(50));
    let mut rx = poller.subscribe();

    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            rx.changed().await.unwrap();
            if rx.borrow().title.as_deref() == Some("Wait") {
                break;
            }
        }
    })
    .await
    .expect("poller publishes the track change");

    assert_eq!(poller.current().artist.as_deref(), Some("M83"));
    poller.stop();
}

#[tokio::test]
async fn test_poller_keeps_last_value_on_fetch_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metadata/nowplaying.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("StationName\nMidnight City - M83"),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/metadata/nowplaying.txt"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let poller = NowPlayingPoller::spawn(client_for(&mock_server), Duration::from_millis(50));
    let mut rx = poller.subscribe();

    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            rx.changed().await.unwrap();
            if rx.borrow().title.is_some() {
                break;
            }
        }
    })
    .await
    .expect("first fetch publishes");

    // let a few failing polls happen; the last good value must survive
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(poller.current().title.as_deref(), Some("Midnight City"));
    poller.stop();
}
