// src/ingest/types.rs
use serde::{Deserialize, Serialize};

use super::FeedError;

/// Canonical view of the newest feed entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedItem {
    pub id: String, // guid, or link when the feed has none
    pub title: String,
    pub summary: String,
    pub link: String,
    pub published_at: Option<u64>, // unix seconds, from pubDate
}

#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    /// Raw feed document (XML text).
    async fn fetch(&self) -> Result<String, FeedError>;
    fn name(&self) -> &'static str;
}
