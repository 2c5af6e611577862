// src/ingest/providers/mod.rs
pub mod http;
pub mod synthetic;

pub use http::HttpFeedSource;
pub use synthetic::{SyntheticArticle, SyntheticFeedSource};
