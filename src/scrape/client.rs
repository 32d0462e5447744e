//! HTTP client for fetching schedule pages.

use anyhow::{Context, Result};
use std::time::Duration;

/// Thin wrapper over [`reqwest::Client`] with the fixed User-Agent the
/// schedule pages expect. No per-request retries; the next refresh tick is
/// the retry mechanism.
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { client })
    }

    /// Fetch a page body as text.
    pub async fn get(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request failed: {}", url))?
            .error_for_status()
            .with_context(|| format!("bad status from {}", url))?;

        response
            .text()
            .await
            .with_context(|| format!("failed to read body from {}", url))
    }
}
