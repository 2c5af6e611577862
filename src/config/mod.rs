// src/config/mod.rs
//! Process configuration, read from the environment (and `.env` in dev).

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::notify::pushover::DEFAULT_PUSHOVER_API_URL;
use crate::store::DEFAULT_LAST_ID_PATH;

// --- env defaults & names ---
pub const DEFAULT_RSS_URL: &str = "https://www.vaticannews.va/en.rss.xml";
pub const DEFAULT_ERROR_DUMP_PATH: &str = "rss_error.txt";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

pub const ENV_RSS_URL: &str = "RSS_URL";
pub const ENV_LAST_ID_PATH: &str = "LAST_ID_PATH";
pub const ENV_TEST_MODE: &str = "TEST_MODE";
pub const ENV_PUSHOVER_USER_KEY: &str = "PUSHOVER_USER_KEY";
pub const ENV_PUSHOVER_APP_TOKEN: &str = "PUSHOVER_APP_TOKEN";
pub const ENV_PUSHOVER_API_URL: &str = "PUSHOVER_API_URL";
pub const ENV_CLASSIFIER_CONFIG_PATH: &str = crate::classify::phrases::ENV_CLASSIFIER_CONFIG_PATH;
pub const ENV_FEED_DUMP_PATH: &str = "FEED_DUMP_PATH";
pub const ENV_ERROR_DUMP_PATH: &str = "ERROR_DUMP_PATH";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "HTTP_TIMEOUT_SECS";
pub const ENV_METRICS_SUMMARY: &str = "METRICS_SUMMARY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a boolean (true/false), got `{value}`")]
    InvalidBool { var: &'static str, value: String },
    #[error("{var} must be a positive integer, got `{value}`")]
    InvalidNumber { var: &'static str, value: String },
}

/// Synthetic feed + test-tagged alert + no persistence, or the real thing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Live,
    Test,
}

impl RunMode {
    pub fn is_test(self) -> bool {
        self == RunMode::Test
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct PushoverCredentials {
    pub user_key: String,
    pub app_token: String,
}

// Never print secrets, even at debug level.
impl fmt::Debug for PushoverCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushoverCredentials")
            .field("user_key", &"<redacted>")
            .field("app_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub rss_url: String,
    pub last_id_path: PathBuf,
    pub mode: RunMode,
    /// `None` when either value is unset or blank.
    pub pushover: Option<PushoverCredentials>,
    pub pushover_api_url: String,
    pub classifier_config_path: Option<PathBuf>,
    pub feed_dump_path: Option<PathBuf>,
    pub error_dump_path: PathBuf,
    pub http_timeout: Duration,
    pub metrics_summary: bool,
}

fn parse_bool(var: &'static str, raw: Option<String>) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        _ => Err(ConfigError::InvalidBool { var, value: raw }),
    }
}

fn non_blank(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from any key lookup (tests pass a map instead of the process env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| non_blank(lookup(k));

        let mode = if parse_bool(ENV_TEST_MODE, lookup(ENV_TEST_MODE))? {
            RunMode::Test
        } else {
            RunMode::Live
        };

        let pushover = match (get(ENV_PUSHOVER_USER_KEY), get(ENV_PUSHOVER_APP_TOKEN)) {
            (Some(user_key), Some(app_token)) => Some(PushoverCredentials {
                user_key,
                app_token,
            }),
            _ => None,
        };

        let http_timeout = match get(ENV_HTTP_TIMEOUT_SECS) {
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            Some(v) => match v.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidNumber {
                        var: ENV_HTTP_TIMEOUT_SECS,
                        value: v,
                    })
                }
            },
        };

        Ok(Self {
            rss_url: get(ENV_RSS_URL).unwrap_or_else(|| DEFAULT_RSS_URL.to_string()),
            last_id_path: get(ENV_LAST_ID_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LAST_ID_PATH)),
            mode,
            pushover,
            pushover_api_url: get(ENV_PUSHOVER_API_URL)
                .unwrap_or_else(|| DEFAULT_PUSHOVER_API_URL.to_string()),
            classifier_config_path: get(ENV_CLASSIFIER_CONFIG_PATH).map(PathBuf::from),
            feed_dump_path: get(ENV_FEED_DUMP_PATH).map(PathBuf::from),
            error_dump_path: error_dump_path_from(&lookup),
            http_timeout,
            metrics_summary: parse_bool(ENV_METRICS_SUMMARY, lookup(ENV_METRICS_SUMMARY))?,
        })
    }
}

fn error_dump_path_from<F>(lookup: &F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    non_blank(lookup(ENV_ERROR_DUMP_PATH))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ERROR_DUMP_PATH))
}

/// Where the failure backstop writes its dump; usable even when the rest of
/// the configuration failed to load.
pub fn error_dump_path_from_env() -> PathBuf {
    error_dump_path_from(&|k: &str| std::env::var(k).ok())
}
