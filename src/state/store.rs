//! Params store implementation
//!
//! Provides file-based persistence of [`IntegrationParams`] with atomic writes.

use super::params::IntegrationParams;
use crate::connector::CredentialsUpdate;
use crate::error::{Error, Result};
use crate::types::Identity;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Default location of the params file, relative to the working directory
pub const DEFAULT_PARAMS_PATH: &str = ".integration-hub/params.json";

/// Store for persisting and loading integration params
#[derive(Debug)]
pub struct ParamsStore {
    /// Path to the params file
    path: PathBuf,
    /// Current params (cached)
    params: Arc<RwLock<IntegrationParams>>,
    /// Whether to save after every update
    auto_save: bool,
}

impl ParamsStore {
    /// Create a store backed by `path` without reading it
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            params: Arc::new(RwLock::new(IntegrationParams::new())),
            auto_save: true,
        }
    }

    /// Create an in-memory store (no file persistence)
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            params: Arc::new(RwLock::new(IntegrationParams::new())),
            auto_save: false,
        }
    }

    /// Create a store from a file, loading existing params if present
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let params = if path.exists() {
            let contents = std::fs::read_to_string(&path).map_err(|e| Error::State {
                message: format!("Failed to read params file: {e}"),
            })?;
            serde_json::from_str(&contents).map_err(|e| Error::State {
                message: format!("Failed to parse params file: {e}"),
            })?
        } else {
            IntegrationParams::new()
        };

        Ok(Self {
            path,
            params: Arc::new(RwLock::new(params)),
            auto_save: true,
        })
    }

    /// Save current params to file
    pub async fn save(&self) -> Result<()> {
        if self.is_in_memory() {
            return Ok(());
        }

        let params = self.params.read().await;
        let contents = serde_json::to_string_pretty(&*params).map_err(|e| Error::State {
            message: format!("Failed to serialize params: {e}"),
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::State {
                    message: format!("Failed to create params directory: {e}"),
                })?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::State {
                message: format!("Failed to write params file: {e}"),
            })?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::State {
                message: format!("Failed to rename params file: {e}"),
            })?;

        debug!("Saved params to {}", self.path.display());
        Ok(())
    }

    /// Snapshot of the current params
    pub async fn params(&self) -> IntegrationParams {
        self.params.read().await.clone()
    }

    /// Apply a connector update, saving if anything changed
    pub async fn apply(&self, update: CredentialsUpdate) -> Result<bool> {
        let changed = self.params.write().await.apply(update);
        if changed && self.auto_save {
            self.save().await?;
        }
        Ok(changed)
    }

    /// Record the identity credentials were issued for
    pub async fn set_identity(&self, identity: Identity) -> Result<()> {
        self.params.write().await.identity = Some(identity);
        if self.auto_save {
            self.save().await?;
        }
        Ok(())
    }

    /// Forget everything
    pub async fn clear(&self) -> Result<()> {
        *self.params.write().await = IntegrationParams::new();
        if self.auto_save {
            self.save().await?;
        }
        Ok(())
    }

    /// Get the params file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if using in-memory mode
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str().is_empty()
    }
}

impl Clone for ParamsStore {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            params: Arc::clone(&self.params),
            auto_save: self.auto_save,
        }
    }
}
