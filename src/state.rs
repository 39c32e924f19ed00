//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use crate::{config::Config, db::RecordStore, storage::FileStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// User and project tables
    store: RecordStore,

    /// Uploaded artifacts and profile pictures
    files: FileStore,

    /// Application configuration
    config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Self {
        let store = RecordStore::new(config.storage.data_dir.clone());
        let files = FileStore::new(
            config.storage.projects_path.clone(),
            config.storage.profiles_path.clone(),
        );

        Self {
            inner: Arc::new(AppStateInner {
                store,
                files,
                config,
            }),
        }
    }

    /// Create tables and upload directories that do not exist yet
    pub async fn initialize(&self) -> anyhow::Result<()> {
        self.inner.store.initialize().await?;
        self.inner.files.initialize().await?;
        Ok(())
    }

    /// Get a reference to the record store
    pub fn store(&self) -> &RecordStore {
        &self.inner.store
    }

    /// Get a reference to the upload storage
    pub fn files(&self) -> &FileStore {
        &self.inner.files
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
