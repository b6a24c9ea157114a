//! HTTP fetch collaborator.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;

use driftwatch_core::fetch::{FetchedContent, Fetcher};

/// Fetches `http(s)://` addresses with a GET request; `file://` addresses
/// are read from disk for local testing and offline pipelines.
///
/// The extraction spec is accepted opaquely and the full body is returned as
/// both content and summary. Richer extractors (browser automation, LLM
/// extraction) implement [`Fetcher`] behind the same seam.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, address: &str, _extraction_spec: &str) -> Result<FetchedContent> {
        if let Some(path) = address.strip_prefix("file://") {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {path}"))?;
            return Ok(FetchedContent::plain(content));
        }

        if !address.starts_with("http://") && !address.starts_with("https://") {
            bail!("Unsupported address scheme: {address}");
        }

        let resp = self
            .client
            .get(address)
            .send()
            .await
            .with_context(|| format!("Request to {address} failed"))?
            .error_for_status()
            .with_context(|| format!("Request to {address} returned an error status"))?;

        let content = resp
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {address}"))?;

        Ok(FetchedContent::plain(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_scheme_reads_disk() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("page.txt");
        std::fs::write(&path, "hello").unwrap();

        let fetcher = HttpFetcher::new(Duration::from_secs(5), "test").unwrap();
        let fetched = fetcher
            .fetch(&format!("file://{}", path.display()), "")
            .await
            .unwrap();

        assert_eq!(fetched.content, "hello");
        assert_eq!(fetched.summary, "hello");
    }

    #[tokio::test]
    async fn test_missing_file_errors() {
        let fetcher = HttpFetcher::new(Duration::from_secs(5), "test").unwrap();
        assert!(fetcher.fetch("file:///no/such/file", "").await.is_err());
    }

    #[tokio::test]
    async fn test_unknown_scheme_rejected() {
        let fetcher = HttpFetcher::new(Duration::from_secs(5), "test").unwrap();
        assert!(fetcher.fetch("gopher://x.test", "").await.is_err());
    }
}
