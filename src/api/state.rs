//! Shared application state
//!
//! Built once at startup and handed to every handler. The record store is
//! opened here and injected into the services; handlers never construct
//! storage themselves.

use std::sync::Arc;

use anyhow::Context;

use crate::adapters::{DiskUploadStorage, FileRecordStore, HttpVerificationProvider, MemoryRecordStore};
use crate::config::{Config, Database};
use crate::core::ports::{RecordStore, UploadStorage, VerificationProvider};
use crate::core::services::{Reconciler, UploadDispatcher};

/// Services shared by all request handlers
#[derive(Debug, Clone)]
pub struct AppState {
    /// Records results and admin decisions
    pub reconciler: Reconciler,
    /// Runs the upload pipeline
    pub dispatcher: UploadDispatcher,
}

impl AppState {
    /// Wire state from explicit collaborators
    #[must_use]
    pub fn new(
        store: Arc<dyn RecordStore>,
        uploads: Arc<dyn UploadStorage>,
        provider: Arc<dyn VerificationProvider>,
    ) -> Self {
        let reconciler = Reconciler::new(store);
        let dispatcher = UploadDispatcher::new(uploads, provider, reconciler.clone());
        Self {
            reconciler,
            dispatcher,
        }
    }

    /// Wire state for serving from configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store = open_store(config)?;
        let uploads = Arc::new(DiskUploadStorage::new(config.upload_dir()));
        log::info!("Upload directory: {}", uploads.dir().display());
        let provider = HttpVerificationProvider::new(config.base_url()?, config.verifier_timeout())
            .context("Failed to build verification client")?;
        log::info!("Verification API URL: {}", provider.endpoint());
        Ok(Self::new(store, uploads, Arc::new(provider)))
    }
}

/// Open the record store named by the configuration
pub fn open_store(config: &Config) -> anyhow::Result<Arc<dyn RecordStore>> {
    let database = config.database()?;
    let store: Arc<dyn RecordStore> = match &database {
        Database::File(root) => Arc::new(
            FileRecordStore::open(root)
                .with_context(|| format!("Failed to open record store at {}", root.display()))?,
        ),
        Database::Memory => Arc::new(MemoryRecordStore::new()),
    };
    log::info!("Record store: {database}");
    Ok(store)
}
