//! Real file-backed key-value storage
//!
//! Each key is stored as `<base_dir>/<key>.json`. Writes go to a temporary
//! file first and are renamed into place, so a crash never leaves a
//! half-written value behind.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use shared::{component_debug, Component};

use crate::error::{QuotebookError, QuotebookResult};
use crate::traits::KeyValueStore;

/// Real file storage implementation
#[derive(Debug, Clone)]
pub struct RealFileStorage {
    /// Directory holding one file per key
    base_dir: PathBuf,
}

impl RealFileStorage {
    /// Create storage in the default `./data` folder
    pub fn new() -> Self {
        Self {
            base_dir: PathBuf::from("./data"),
        }
    }

    /// Create with custom base directory
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// File path for a key
    fn key_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", sanitize_key(key)))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json.tmp", sanitize_key(key)))
    }
}

impl Default for RealFileStorage {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep keys safe to use as file names
fn sanitize_key(key: &str) -> String {
    let cleaned: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();

    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned
    }
}

#[async_trait]
impl KeyValueStore for RealFileStorage {
    async fn get(&self, key: &str) -> QuotebookResult<Option<String>> {
        let path = self.key_path(key);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(QuotebookError::storage("read", key, e)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> QuotebookResult<()> {
        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| QuotebookError::storage("create directory", key, e))?;

        let temp_path = self.temp_path(key);
        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| QuotebookError::storage("create", key, e))?;
        file.write_all(value.as_bytes())
            .await
            .map_err(|e| QuotebookError::storage("write", key, e))?;
        file.sync_all()
            .await
            .map_err(|e| QuotebookError::storage("sync", key, e))?;
        drop(file);

        let path = self.key_path(key);
        fs::rename(&temp_path, &path)
            .await
            .map_err(|e| QuotebookError::storage("rename", key, e))?;

        component_debug!(Component::Storage, "💾 Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    async fn remove(&self, key: &str) -> QuotebookResult<()> {
        match fs::remove_file(self.key_path(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(QuotebookError::storage("remove", key, e)),
        }
    }
}
