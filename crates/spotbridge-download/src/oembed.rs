//! Spotify oEmbed lookups.
//!
//! The public oEmbed endpoint returns a display title for a Spotify URL
//! without any credentials, which is enough to build a search query.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Public Spotify oEmbed endpoint.
pub const OEMBED_ENDPOINT: &str = "https://open.spotify.com/oembed";

/// Errors from an oEmbed lookup.
#[derive(Error, Debug)]
pub enum OembedError {
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("oEmbed request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("oEmbed returned status {status}")]
    Status { status: u16 },
}

#[derive(Debug, Deserialize)]
struct OembedResponse {
    #[serde(default)]
    title: String,
}

/// Extract a non-empty title from an oEmbed response body.
pub fn parse_oembed_title(body: &str) -> Option<String> {
    let response: OembedResponse = serde_json::from_str(body).ok()?;
    let title = response.title.trim();
    (!title.is_empty()).then(|| title.to_string())
}

/// Minimal client for the oEmbed endpoint.
#[derive(Debug, Clone)]
pub struct OembedClient {
    client: reqwest::Client,
    endpoint: String,
}

impl OembedClient {
    /// Create a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, OembedError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("spotbridge/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(OembedError::Client)?;
        Ok(Self {
            client,
            endpoint: OEMBED_ENDPOINT.to_string(),
        })
    }

    /// Point the client at a different endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Request URL for `spotify_url`.
    pub fn request_url(&self, spotify_url: &str) -> String {
        format!("{}?url={}", self.endpoint, urlencoding::encode(spotify_url))
    }

    /// Fetch the display title for `spotify_url`.
    ///
    /// Returns `Ok(None)` when the response has no usable title.
    pub async fn fetch_title(&self, spotify_url: &str) -> Result<Option<String>, OembedError> {
        let url = self.request_url(spotify_url);
        debug!(%url, "fetching oEmbed metadata");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(OembedError::Status {
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        Ok(parse_oembed_title(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_title() {
        let body = r#"{"html": "<iframe/>", "title": "  Bohemian Rhapsody - Remastered 2011 "}"#;
        assert_eq!(
            parse_oembed_title(body).as_deref(),
            Some("Bohemian Rhapsody - Remastered 2011")
        );
    }

    #[test]
    fn test_parse_missing_or_blank_title() {
        assert_eq!(parse_oembed_title(r#"{"type": "rich"}"#), None);
        assert_eq!(parse_oembed_title(r#"{"title": "   "}"#), None);
        assert_eq!(parse_oembed_title("not json"), None);
    }

    #[test]
    fn test_request_url_is_encoded() {
        let client = OembedClient::new(Duration::from_secs(10)).unwrap();
        assert_eq!(
            client.request_url("https://open.spotify.com/track/abc?si=1&x=2"),
            "https://open.spotify.com/oembed?url=https%3A%2F%2Fopen.spotify.com%2Ftrack%2Fabc%3Fsi%3D1%26x%3D2"
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let client = OembedClient::new(Duration::from_secs(2))
            .unwrap()
            .with_endpoint("http://127.0.0.1:9/oembed");
        let result = client
            .fetch_title("https://open.spotify.com/track/abc")
            .await;
        assert!(matches!(result, Err(OembedError::Request(_))));
    }
}
