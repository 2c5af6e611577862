// src/notify/mod.rs
pub mod pushover;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::config::RunMode;
use crate::ingest::FeedItem;

pub use pushover::PushoverNotifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Test,
    Real,
}

impl From<RunMode> for Severity {
    fn from(mode: RunMode) -> Self {
        match mode {
            RunMode::Test => Severity::Test,
            RunMode::Live => Severity::Real,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRequest {
    pub title: String,
    pub link: String,
    pub severity: Severity,
}

impl NotificationRequest {
    pub fn for_item(item: &FeedItem, mode: RunMode) -> Self {
        Self {
            title: item.title.clone(),
            link: item.link.clone(),
            severity: mode.into(),
        }
    }

    /// Alert headline; test alerts must be told apart at a glance.
    pub fn headline(&self) -> &'static str {
        match self.severity {
            Severity::Test => "*** TEST POPE ALERT ***",
            Severity::Real => "*** NEW POPE ELECTED ***",
        }
    }

    pub fn message(&self) -> String {
        format!("{}\n{}", self.title, self.link)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("notification credentials are not configured")]
    MissingCredentials,
    #[error("notification transport failed: {0}")]
    Transport(String),
    #[error("notification rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, req: &NotificationRequest) -> Result<(), NotifyError>;
    fn name(&self) -> &'static str;
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Test => "test",
            Severity::Real => "real",
        })
    }
}
