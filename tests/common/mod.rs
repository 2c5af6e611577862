// tests/common/mod.rs
// Test doubles shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use conclave_watch::classify::Classifier;
use conclave_watch::notify::{NotificationRequest, Notifier, NotifyError};
use conclave_watch::store::{LastSeenStore, StoreError};
use conclave_watch::{FeedError, FeedSource, Pipeline, RunMode};

/// Serves a fixed body (or a fixed error) without touching the network.
pub struct StaticFeed(pub Result<String, FeedError>);

impl StaticFeed {
    pub fn xml(body: &str) -> Arc<Self> {
        Arc::new(Self(Ok(body.to_string())))
    }
}

#[async_trait]
impl FeedSource for StaticFeed {
    async fn fetch(&self) -> Result<String, FeedError> {
        self.0.clone()
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// Records every request; answers with `result`.
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<NotificationRequest>>,
    result: Result<(), NotifyError>,
}

impl RecordingNotifier {
    pub fn ok() -> Arc<Self> {
        Self::answering(Ok(()))
    }

    pub fn answering(result: Result<(), NotifyError>) -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
            result,
        })
    }

    pub fn calls(&self) -> Vec<NotificationRequest> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, req: &NotificationRequest) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(req.clone());
        self.result.clone()
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Reads a fixed value, refuses every write.
pub struct ReadOnlyStore(pub Option<String>);

#[async_trait]
impl LastSeenStore for ReadOnlyStore {
    async fn read_last_id(&self) -> Option<String> {
        self.0.clone()
    }

    async fn write_last_id(&self, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::Write {
            path: "/read-only/last_guid.txt".into(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        })
    }
}

pub fn rss(items: &[(&str, &str, &str, &str)]) -> String {
    let mut body = String::new();
    for (guid, title, description, link) in items {
        body.push_str(&format!(
            "<item><guid>{guid}</guid><title>{title}</title>\
             <description>{description}</description><link>{link}</link></item>"
        ));
    }
    format!(r#"<?xml version="1.0"?><rss version="2.0"><channel><title>t</title>{body}</channel></rss>"#)
}

pub fn pipeline(
    feed: Arc<dyn FeedSource>,
    store: Arc<dyn LastSeenStore>,
    notifier: Arc<dyn Notifier>,
    mode: RunMode,
) -> Pipeline {
    Pipeline::new(feed, Arc::new(Classifier::default()), store, notifier, mode)
}
