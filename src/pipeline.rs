// src/pipeline.rs
//! Run-once pipeline: fetch → parse → normalize → classify → dedupe → notify → persist.
//!
//! Fetch and structural errors abort the run before anything is written.
//! Notification and storage failures are recorded in the [`RunReport`] and the
//! run still completes.

use anyhow::Context;
use metrics::counter;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::classify::{Classification, Classifier, Verdict};
use crate::config::{AppConfig, RunMode};
use crate::ingest::providers::{HttpFeedSource, SyntheticFeedSource};
use crate::ingest::{extract_latest, FeedError, FeedItem, FeedSource};
use crate::notify::{NotificationRequest, Notifier, NotifyError, PushoverNotifier};
use crate::store::{FileStore, LastSeenStore};
use crate::telemetry::ensure_metrics_described;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum NotificationStatus {
    /// Classification did not call for an alert.
    NotAttempted,
    Sent,
    /// Non-fatal: e.g. credentials are not configured.
    Skipped(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum PersistStatus {
    Written,
    SkippedTestMode,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub item: FeedItem,
    pub verdict: Verdict,
    pub notification: NotificationStatus,
    pub persistence: PersistStatus,
}

impl RunReport {
    pub fn classification(&self) -> Classification {
        self.verdict.classification
    }

    /// Completed, but an operator should look at it.
    pub fn is_degraded(&self) -> bool {
        matches!(
            self.notification,
            NotificationStatus::Failed(_) | NotificationStatus::Skipped(_)
        ) || matches!(self.persistence, PersistStatus::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// Newest item was already handled by a previous run.
    SkippedDuplicate { id: String },
    Completed(RunReport),
}

pub struct Pipeline {
    source: Arc<dyn FeedSource>,
    classifier: Arc<Classifier>,
    store: Arc<dyn LastSeenStore>,
    notifier: Arc<dyn Notifier>,
    mode: RunMode,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn FeedSource>,
        classifier: Arc<Classifier>,
        store: Arc<dyn LastSeenStore>,
        notifier: Arc<dyn Notifier>,
        mode: RunMode,
    ) -> Self {
        Self {
            source,
            classifier,
            store,
            notifier,
            mode,
        }
    }

    /// Wire the production collaborators. Test mode swaps in the synthetic
    /// feed; everything else is identical.
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let classifier = Classifier::from_optional_path(cfg.classifier_config_path.as_deref())
            .context("loading classifier phrase book")?;

        let source: Arc<dyn FeedSource> = match cfg.mode {
            RunMode::Test => Arc::new(SyntheticFeedSource::default()),
            RunMode::Live => Arc::new(
                HttpFeedSource::new(cfg.rss_url.clone())
                    .with_timeout(cfg.http_timeout)
                    .with_dump_path(cfg.feed_dump_path.clone()),
            ),
        };

        let notifier = PushoverNotifier::new(cfg.pushover.clone())
            .with_api_url(cfg.pushover_api_url.clone())
            .with_timeout(cfg.http_timeout);

        Ok(Self::new(
            source,
            Arc::new(classifier),
            Arc::new(FileStore::new(cfg.last_id_path.clone())),
            Arc::new(notifier),
            cfg.mode,
        ))
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub async fn run_once(&self) -> Result<RunOutcome, FeedError> {
        ensure_metrics_described();
        counter!("feed_runs_total").increment(1);
        if self.mode.is_test() {
            info!(source = self.source.name(), "running in test mode");
        }

        let raw = self.source.fetch().await?;
        let item = extract_latest(&raw)?;
        debug!(id = %item.id, link = %item.link, published_at = ?item.published_at, "latest item");

        let verdict = self.classifier.explain(&item.title, &item.summary);
        counter!("feed_classified_total", "class" => verdict.classification.as_str()).increment(1);
        debug!(
            class = %verdict.classification,
            rule = ?verdict.rule,
            score = ?verdict.score,
            matched = ?verdict.matched,
            "classified"
        );

        if !self.mode.is_test() {
            let last_seen = self.store.read_last_id().await;
            if last_seen.as_deref() == Some(item.id.as_str()) {
                counter!("feed_duplicates_total").increment(1);
                info!(id = %item.id, title = %item.title, "skipping duplicate");
                return Ok(RunOutcome::SkippedDuplicate { id: item.id });
            }
        }

        let notification = match verdict.classification {
            Classification::Announcement => {
                info!(title = %item.title, link = %item.link, "NEW POPE ELECTED");
                self.dispatch(&item).await
            }
            class => {
                info!(class = %class, title = %item.title, "no alert");
                NotificationStatus::NotAttempted
            }
        };

        let persistence = self.persist(&item.id).await;

        Ok(RunOutcome::Completed(RunReport {
            item,
            verdict,
            notification,
            persistence,
        }))
    }

    async fn dispatch(&self, item: &FeedItem) -> NotificationStatus {
        let req = NotificationRequest::for_item(item, self.mode);
        match self.notifier.notify(&req).await {
            Ok(()) => NotificationStatus::Sent,
            Err(e @ NotifyError::MissingCredentials) => {
                warn!(notifier = self.notifier.name(), "{e}; alert not sent");
                NotificationStatus::Skipped(e.to_string())
            }
            Err(e) => {
                counter!("notify_failures_total").increment(1);
                error!(notifier = self.notifier.name(), error = %e, "alert failed");
                NotificationStatus::Failed(e.to_string())
            }
        }
    }

    async fn persist(&self, id: &str) -> PersistStatus {
        if self.mode.is_test() {
            debug!("test mode: last seen id left untouched");
            return PersistStatus::SkippedTestMode;
        }
        match self.store.write_last_id(id).await {
            Ok(()) => PersistStatus::Written,
            Err(e) => {
                counter!("store_failures_total").increment(1);
                error!(error = %e, "could not persist last seen id; next run may repeat this item");
                PersistStatus::Failed(e.to_string())
            }
        }
    }
}
