//! HTTP client with a fixed politeness delay.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::engine::PageFetcher;
use super::ScrapeError;

/// Thin wrapper over reqwest applying a user agent, a timeout and a fixed
/// delay after every request. Retry policy and concurrency stay out of the
/// pipeline entirely.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    request_delay: Duration,
}

impl HttpClient {
    /// Create a new HTTP client.
    pub fn new(
        user_agent: &str,
        timeout: Duration,
        request_delay: Duration,
    ) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            request_delay,
        })
    }

    /// Fetch a page body as text. Non-success statuses are errors.
    pub async fn get_text(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;

        // Base politeness delay between consecutive requests.
        tokio::time::sleep(self.request_delay).await;

        Ok(body)
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        self.get_text(url).await
    }
}
