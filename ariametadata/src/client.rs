//! HTTP client for the now-playing resource

use crate::error::{Error, Result};
use crate::models::NowPlaying;
use reqwest::Client;
use std::time::Duration;

/// Default timeout for metadata requests (5 seconds; the payload is tiny)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

/// Default User-Agent
pub const DEFAULT_USER_AGENT: &str = "AriaRadio/0.1 (ariametadata)";

/// Client for the station's now-playing text resource.
///
/// Stateless; fetches and parses the two-line payload on demand. Polling
/// and caching are handled by [`crate::poller::NowPlayingPoller`].
#[derive(Debug, Clone)]
pub struct MetadataClient {
    client: Client,
    url: String,
}

impl MetadataClient {
    /// Create a client for `url` with default settings
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::builder().url(url).build()
    }

    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client sharing an existing `reqwest::Client`
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// The polled URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the raw two-line payload
    pub async fn fetch_raw(&self) -> Result<String> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Status(response.status().as_u16()));
        }
        Ok(response.text().await?)
    }

    /// Fetch and parse the currently playing track
    pub async fn now_playing(&self) -> Result<NowPlaying> {
        let payload = self.fetch_raw().await?;
        Ok(NowPlaying::parse(&payload))
    }
}

/// Builder for [`MetadataClient`]
#[derive(Debug, Default)]
pub struct ClientBuilder {
    url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Set the now-playing resource URL (required)
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Override the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the User-Agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<MetadataClient> {
        let url = self
            .url
            .ok_or_else(|| Error::other("metadata URL is required"))?;
        let client = Client::builder()
            .timeout(
                self.timeout
                    .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
            )
            .user_agent(
                self.user_agent
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            )
            .build()?;
        Ok(MetadataClient { client, url })
    }
}
