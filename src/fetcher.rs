//! Web page text retrieval through a reader proxy.
//!
//! The proxy renders the page and returns its readable text; the target URL
//! is appended verbatim to the proxy base.

use crate::config::ReaderSettings;
use crate::error::{Result, SamtaleError};
use crate::retry::{retry, RetryPolicy};
use std::time::Duration;
use tracing::{info, instrument};

/// Fetches readable page text with a fixed retry policy.
pub struct ContentFetcher {
    client: reqwest::Client,
    base_url: String,
    policy: RetryPolicy,
}

impl ContentFetcher {
    /// Create a fetcher from reader settings.
    pub fn new(settings: &ReaderSettings) -> Result<Self> {
        Self::with_config(&settings.base_url, settings.timeout(), settings.retry_policy())
    }

    /// Create a fetcher with an explicit proxy base, timeout and retry policy.
    pub fn with_config(base_url: &str, timeout: Duration, policy: RetryPolicy) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            policy,
        })
    }

    /// Fetch the text of `url`, retrying on any failure.
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let full_url = format!("{}{}", self.base_url, url);

        let text = retry(&self.policy, "URL fetch", |_| self.fetch_once(&full_url))
            .await
            .map_err(|exhausted| SamtaleError::Fetch {
                attempts: exhausted.attempts,
                message: exhausted.error.to_string(),
            })?;

        info!("Fetched {} characters from {}", text.len(), url);
        Ok(text)
    }

    async fn fetch_once(&self, full_url: &str) -> std::result::Result<String, reqwest::Error> {
        self.client
            .get(full_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn fetcher_for(server: &mockito::Server, delay: Duration) -> ContentFetcher {
        ContentFetcher::with_config(
            &format!("{}/", server.url()),
            Duration::from_secs(5),
            RetryPolicy::new(3, delay),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_appends_url_to_proxy_base() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/https://example.com/article")
            .with_status(200)
            .with_body("Title: Example\n\nSome readable text.")
            .create_async()
            .await;

        let fetcher = fetcher_for(&server, Duration::from_millis(10));
        let text = fetcher.fetch("https://example.com/article").await.unwrap();

        mock.assert_async().await;
        assert_eq!(text, "Title: Example\n\nSome readable text.");
    }

    #[tokio::test]
    async fn test_server_error_exhausts_attempts() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/https://example.com/broken")
            .with_status(500)
            .with_body("Internal Server Error")
            .expect(3)
            .create_async()
            .await;

        let delay = Duration::from_millis(50);
        let fetcher = fetcher_for(&server, delay);
        let started = Instant::now();

        let err = fetcher.fetch("https://example.com/broken").await.unwrap_err();

        mock.assert_async().await;
        assert!(started.elapsed() >= delay * 2);
        match &err {
            SamtaleError::Fetch { attempts, message } => {
                assert_eq!(*attempts, 3);
                assert!(message.contains("500"), "cause should mention status: {}", message);
            }
            other => panic!("expected fetch error, got {:?}", other),
        }
        assert!(err.to_string().starts_with("Failed to fetch URL after 3 attempts"));
    }

    #[tokio::test]
    async fn test_client_error_is_also_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/https://example.com/missing")
            .with_status(404)
            .expect(3)
            .create_async()
            .await;

        let fetcher = fetcher_for(&server, Duration::from_millis(1));
        let err = fetcher.fetch("https://example.com/missing").await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(err, SamtaleError::Fetch { attempts: 3, .. }));
    }
}
