//! JSON file state store
//!
//! Keeps the whole keyring aggregate in one pretty-printed JSON document,
//! by default `~/.keybroker/state.json`.

use async_trait::async_trait;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::traits::StateStore;
use crate::error::{Error, Result};
use crate::state::KeyringState;

/// State document path relative to the home directory
pub const DEFAULT_STATE_PATH: &str = ".keybroker/state.json";

/// File-backed state store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create store with custom path
    #[must_use]
    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Return document path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Take the exclusive advisory lock on the document.
    ///
    /// Every process that opens the document holds this lock for as long as
    /// it keeps state in memory. A second holder fails instead of waiting.
    pub fn try_lock(&self) -> Result<StateLock> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::Storage(format!("Failed to create directory {:?}: {}", parent, e))
            })?;
        }

        let lock_path = self.sibling("lock");
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| Error::Storage(format!("Failed to open {:?}: {}", lock_path, e)))?;

        if let Err(e) = file.try_lock_exclusive() {
            if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() {
                return Err(Error::Storage(format!(
                    "{:?} is locked by another keybroker process",
                    self.path
                )));
            }
            return Err(Error::Storage(format!("Failed to lock {:?}: {}", lock_path, e)));
        }

        debug!(path = ?lock_path, "State lock acquired");
        Ok(StateLock {
            file,
            path: lock_path,
        })
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling("tmp")
    }

    fn sibling(&self, extension: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".");
        name.push(extension);
        self.path.with_file_name(name)
    }
}

/// Exclusive hold on a state document, released on drop
#[derive(Debug)]
pub struct StateLock {
    file: File,
    path: PathBuf,
}

impl StateLock {
    /// Lock file path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StateLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load(&self) -> Result<KeyringState> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = ?self.path, "No keyring state on disk, starting empty");
                return Ok(KeyringState::default());
            }
            Err(e) => {
                return Err(Error::Storage(format!(
                    "Failed to read {:?}: {}",
                    self.path, e
                )))
            }
        };

        serde_json::from_str(&content)
            .map_err(|e| Error::Storage(format!("Failed to parse {:?}: {}", self.path, e)))
    }

    async fn persist(&self, state: &KeyringState) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::Storage(format!("Failed to create directory {:?}: {}", parent, e))
            })?;
        }

        let content = serde_json::to_string_pretty(state)?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, content)
            .await
            .map_err(|e| Error::Storage(format!("Failed to write {:?}: {}", temp, e)))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| Error::Storage(format!("Failed to replace {:?}: {}", self.path, e)))?;

        debug!(path = ?self.path, "State document written");
        Ok(())
    }
}
