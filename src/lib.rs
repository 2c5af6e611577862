// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod classify;
pub mod config;
pub mod diagnostics;
pub mod ingest;
pub mod notify;
pub mod pipeline;
pub mod store;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::classify::{Classification, Classifier, PhraseBook};
pub use crate::config::{AppConfig, RunMode};
pub use crate::ingest::{FeedError, FeedItem, FeedSource};
pub use crate::notify::{NotificationRequest, Notifier, NotifyError, Severity};
pub use crate::pipeline::{Pipeline, RunOutcome, RunReport};
pub use crate::store::{FileStore, LastSeenStore, MemoryStore, StoreError};
