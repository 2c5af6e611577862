// src/ingest/error.rs
use thiserror::Error;

/// Structural and transport failures; each one aborts the run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("feed fetch failed: {0}")]
    Fetch(String),
    #[error("feed is not well-formed XML: {0}")]
    Parse(String),
    #[error("malformed feed: {0}")]
    MalformedFeed(String),
    #[error("feed contains no items")]
    EmptyFeed,
    #[error("latest feed item has no guid or link")]
    MissingIdentifier,
}
