//! Local filesystem storage implementation.
//!
//! Each record is one JSON file under the root directory: `config.json`
//! and `snapshot.json`. Writes go to a temp file first and are renamed
//! into place, so a reader racing a scrape sees either the old or the new
//! record in full.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{RatingSnapshot, WidgetConfig};
use crate::storage::{ConfigStore, RatingStore};

const CONFIG_KEY: &str = "config.json";
const SNAPSHOT_KEY: &str = "snapshot.json";

/// Local filesystem storage backend.
#[derive(Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if the file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl RatingStore for LocalStorage {
    async fn get(&self) -> Result<Option<RatingSnapshot>> {
        self.read_json(SNAPSHOT_KEY).await
    }

    async fn set(&self, snapshot: &RatingSnapshot) -> Result<()> {
        self.write_json(SNAPSHOT_KEY, snapshot).await
    }
}

#[async_trait]
impl ConfigStore for LocalStorage {
    async fn get_config(&self) -> Result<WidgetConfig> {
        Ok(self.read_json(CONFIG_KEY).await?.unwrap_or_default())
    }

    async fn set_config(&self, config: WidgetConfig) -> Result<()> {
        self.write_json(CONFIG_KEY, &config.sanitized()).await
    }
}
