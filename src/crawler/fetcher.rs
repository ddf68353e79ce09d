//! HTTP fetcher implementation
//!
//! The crawl loop only needs "give me the bytes at this URL, or nothing", so
//! every failure mode (transport error, timeout, non-success status, body
//! read error) collapses into an empty body. The [`PageFetcher`] trait is the
//! seam where a different retrieval strategy can be plugged in.

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Retrieves raw page bytes
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches `url`, returning an empty body on any failure
    async fn fetch(&self, url: &str) -> Vec<u8>;
}

/// Builds an HTTP client with proper configuration
///
/// The user agent is `CrawlerName/Version (+ContactURL; ContactEmail)`.
///
/// # Example
///
/// ```no_run
/// use kumo_search::config::UserAgentConfig;
/// use kumo_search::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "Kumo".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10).min(timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`PageFetcher`] backed by a plain `reqwest` GET
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config, timeout)?))
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Vec<u8> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                if e.is_timeout() {
                    tracing::warn!(url = %url, "Request timeout");
                } else if e.is_connect() {
                    tracing::warn!(url = %url, "Connection refused");
                } else {
                    tracing::warn!(url = %url, error = %e, "Fetch failed");
                }
                return Vec::new();
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::info!(url = %url, status = status.as_u16(), "Non-success response");
            return Vec::new();
        }

        match response.bytes().await {
            Ok(body) => body.to_vec(),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Failed to read response body");
                Vec::new()
            }
        }
    }
}
