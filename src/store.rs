// src/store.rs
//! Last-seen identifier store. Single text value, trimmed on both ends.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;
use tokio::fs;

pub const DEFAULT_LAST_ID_PATH: &str = "last_guid.txt";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("writing last seen id to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[async_trait]
pub trait LastSeenStore: Send + Sync {
    /// `None` means no history yet; never an error.
    async fn read_last_id(&self) -> Option<String>;
    async fn write_last_id(&self, id: &str) -> Result<(), StoreError>;
}

fn non_empty(s: &str) -> Option<String> {
    let t = s.trim();
    (!t.is_empty()).then(|| t.to_string())
}

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl LastSeenStore for FileStore {
    async fn read_last_id(&self) -> Option<String> {
        match fs::read_to_string(&self.path).await {
            Ok(s) => non_empty(&s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "last seen id unreadable, treating as empty");
                None
            }
        }
    }

    async fn write_last_id(&self, id: &str) -> Result<(), StoreError> {
        let err = |source| StoreError::Write {
            path: self.path.display().to_string(),
            source,
        };
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await.map_err(err)?;
        }
        fs::write(&self.path, id.trim()).await.map_err(err)
    }
}

/// In-process store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    value: Mutex<Option<String>>,
    writes: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(id: &str) -> Self {
        Self {
            value: Mutex::new(non_empty(id)),
            writes: Mutex::new(0),
        }
    }

    pub fn write_count(&self) -> usize {
        *self.writes.lock().expect("store mutex poisoned")
    }
}

#[async_trait]
impl LastSeenStore for MemoryStore {
    async fn read_last_id(&self) -> Option<String> {
        self.value.lock().expect("store mutex poisoned").clone()
    }

    async fn write_last_id(&self, id: &str) -> Result<(), StoreError> {
        *self.value.lock().expect("store mutex poisoned") = non_empty(id);
        *self.writes.lock().expect("store mutex poisoned") += 1;
        Ok(())
    }
}
