// src/ingest/providers/http.rs
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

use crate::ingest::types::FeedSource;
use crate::ingest::FeedError;

/// Live feed over HTTP. Any transport error or non-2xx status is fatal.
pub struct HttpFeedSource {
    url: String,
    client: Client,
    timeout: Duration,
    dump_path: Option<PathBuf>,
}

impl HttpFeedSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
            timeout: Duration::from_secs(10),
            dump_path: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Keep a copy of the last raw body for post-mortems.
    pub fn with_dump_path(mut self, path: Option<PathBuf>) -> Self {
        self.dump_path = path;
        self
    }

    async fn dump(&self, body: &str) {
        let Some(path) = &self.dump_path else {
            return;
        };
        if let Err(e) = tokio::fs::write(path, body).await {
            tracing::warn!(error = %e, path = %path.display(), "could not write feed dump");
        }
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self) -> Result<String, FeedError> {
        let resp = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FeedError::Fetch(format!("GET {}: {e}", self.url)))?;

        let resp = resp
            .error_for_status()
            .map_err(|e| FeedError::Fetch(format!("GET {}: {e}", self.url)))?;

        let body = resp
            .text()
            .await
            .map_err(|e| FeedError::Fetch(format!("reading body of {}: {e}", self.url)))?;

        tracing::debug!(url = %self.url, bytes = body.len(), "feed downloaded");
        self.dump(&body).await;
        Ok(body)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
