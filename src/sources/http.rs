//! HTTP page fetcher backed by reqwest

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::traits::PageFetcher;
use crate::config::SourceConfig;
use crate::errors::{AppError, AppResult, SourceError};
use crate::utils::retry::{with_retry, RetryConfig};

/// Fetches listing pages over plain HTTP(S)
///
/// Non-success statuses become [`SourceError::Http`]; connection and timeout
/// failures become [`SourceError::Transport`]. Both 5xx/429 responses and
/// transport failures are retried with backoff.
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: Client,
    retry: RetryConfig,
}

impl HttpPageFetcher {
    /// Build a fetcher from the `[source]` config section
    pub fn new(config: &SourceConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout()?)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            retry: RetryConfig::new(config.max_attempts, config.retry_delay()?),
        })
    }

    async fn fetch_once(&self, url: &str) -> AppResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::transport(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::http(status.as_u16(), url).into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::transport(url, e.to_string()))?;
        debug!("Fetched {} ({} bytes)", url, body.len());
        Ok(body)
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch_page(&self, url: &str) -> AppResult<String> {
        with_retry(&self.retry, || self.fetch_once(url), url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_timeout() {
        let config = SourceConfig {
            request_timeout: "soon".to_string(),
            ..SourceConfig::default()
        };

        assert!(matches!(
            HttpPageFetcher::new(&config),
            Err(AppError::Configuration { .. })
        ));
    }

    #[test]
    fn test_new_uses_configured_attempts() {
        let config = SourceConfig {
            max_attempts: 5,
            ..SourceConfig::default()
        };

        let fetcher = HttpPageFetcher::new(&config).unwrap();
        assert_eq!(fetcher.retry.max_attempts, 5);
    }
}
