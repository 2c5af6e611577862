// src/notify/pushover.rs
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use super::{NotificationRequest, Notifier, NotifyError};
use crate::config::PushoverCredentials;

pub const DEFAULT_PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

/// Emergency priority: repeats until acknowledged or expired.
const PRIORITY_EMERGENCY: i8 = 2;
const RETRY_SECS: u32 = 60;
const EXPIRE_SECS: u32 = 3600;

#[derive(Debug, Serialize)]
struct PushoverPayload<'a> {
    token: &'a str,
    user: &'a str,
    title: &'a str,
    message: String,
    priority: i8,
    retry: u32,
    expire: u32,
}

#[derive(Clone)]
pub struct PushoverNotifier {
    credentials: Option<PushoverCredentials>,
    api_url: String,
    client: Client,
    timeout: Duration,
    max_retries: u8,
    backoff: Duration,
}

impl PushoverNotifier {
    pub fn new(credentials: Option<PushoverCredentials>) -> Self {
        Self {
            credentials,
            api_url: DEFAULT_PUSHOVER_API_URL.to_string(),
            client: Client::new(),
            timeout: Duration::from_secs(10),
            max_retries: 3,
            backoff: Duration::from_millis(500),
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total attempts, including the first one. Zero is treated as one.
    pub fn with_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries.max(1);
        self
    }

    pub fn with_backoff(mut self, base: Duration) -> Self {
        self.backoff = base;
        self
    }

    fn delay(&self, attempt: u8) -> Duration {
        self.backoff * (1u32 << (attempt - 1).min(8))
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    async fn notify(&self, req: &NotificationRequest) -> Result<(), NotifyError> {
        let Some(creds) = &self.credentials else {
            return Err(NotifyError::MissingCredentials);
        };

        let payload = PushoverPayload {
            token: &creds.app_token,
            user: &creds.user_key,
            title: req.headline(),
            message: req.message(),
            priority: PRIORITY_EMERGENCY,
            retry: RETRY_SECS,
            expire: EXPIRE_SECS,
        };

        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let res = self
                .client
                .post(&self.api_url)
                .timeout(self.timeout)
                .json(&payload)
                .send()
                .await;

            let err = match res {
                Ok(rsp) if rsp.status().is_success() => {
                    tracing::info!(severity = %req.severity, attempt, "pushover notification sent");
                    return Ok(());
                }
                Ok(rsp) if rsp.status().is_client_error() => {
                    // 4xx means bad token/user or payload; retrying won't help.
                    let status = rsp.status().as_u16();
                    let body = rsp.text().await.unwrap_or_default();
                    return Err(NotifyError::Rejected { status, body });
                }
                Ok(rsp) => NotifyError::Rejected {
                    status: rsp.status().as_u16(),
                    body: rsp.text().await.unwrap_or_default(),
                },
                Err(e) => NotifyError::Transport(e.to_string()),
            };

            if attempt >= self.max_retries {
                return Err(err);
            }
            tracing::warn!(error = %err, attempt, "pushover attempt failed, retrying");
            tokio::time::sleep(self.delay(attempt)).await;
        }
    }

    fn name(&self) -> &'static str {
        "pushover"
    }
}
