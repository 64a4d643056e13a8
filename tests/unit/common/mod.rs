//! Shared test fixtures and helpers
//!
//! This module provides common utilities for testing idverify components.

use std::sync::{Arc, Mutex};

use idverify::adapters::{DiskUploadStorage, MemoryRecordStore};
use idverify::api::AppState;
use idverify::core::StoreError;
use idverify::core::models::{Approval, StoredUpload, UploadedFile, VerificationRecord};
use idverify::core::ports::{
    ProviderError, ProviderReply, RecordStore, Upserted, VerificationProvider,
};
use idverify::core::services::{FILE_FIELD, FilePart};
use serde_json::{Value, json};
use tempfile::TempDir;

/// Provider stub that answers every submission with a canned reply
pub struct StubProvider {
    reply: Mutex<Option<Result<Value, ProviderError>>>,
    calls: Mutex<Vec<StoredUpload>>,
}

impl StubProvider {
    /// Always answer with `body`
    pub fn replying(body: Value) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(Some(Ok(body))),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Fail the first submission with `err`
    pub fn failing(err: ProviderError) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(Some(Err(err))),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Uploads the provider has seen
    pub fn calls(&self) -> Vec<StoredUpload> {
        self.calls.lock().unwrap().clone()
    }
}

impl VerificationProvider for StubProvider {
    fn submit(&self, upload: &StoredUpload) -> Result<ProviderReply, ProviderError> {
        self.calls.lock().unwrap().push(upload.clone());
        let mut reply = self.reply.lock().unwrap();
        match reply.take() {
            Some(Ok(body)) => {
                *reply = Some(Ok(body.clone()));
                Ok(ProviderReply { body })
            },
            Some(Err(err)) => Err(err),
            None => Err(ProviderError::Transport("stub exhausted".to_string())),
        }
    }
}

/// Record store whose disk is always gone
pub struct BrokenStore;

impl BrokenStore {
    fn error() -> StoreError {
        StoreError::Io(std::io::Error::other("disk unavailable"))
    }
}

impl RecordStore for BrokenStore {
    fn upsert(&self, _record: &VerificationRecord) -> Result<Upserted, StoreError> {
        Err(Self::error())
    }

    fn find(&self, _transaction_guid: &str) -> Result<Option<VerificationRecord>, StoreError> {
        Err(Self::error())
    }

    fn list(&self) -> Result<Vec<VerificationRecord>, StoreError> {
        Err(Self::error())
    }

    fn set_approval(
        &self,
        _transaction_guid: &str,
        _approval: Approval,
    ) -> Result<Option<VerificationRecord>, StoreError> {
        Err(Self::error())
    }
}

/// State over an in-memory store and a temporary upload directory
pub fn state_with(provider: Arc<StubProvider>) -> (AppState, TempDir) {
    state_over(Arc::new(MemoryRecordStore::new()), provider)
}

/// State over `store` and a temporary upload directory
pub fn state_over(store: Arc<dyn RecordStore>, provider: Arc<StubProvider>) -> (AppState, TempDir) {
    let uploads = TempDir::new().unwrap();
    let state = AppState::new(
        store,
        Arc::new(DiskUploadStorage::new(uploads.path().to_path_buf())),
        provider,
    );
    (state, uploads)
}

/// Result payload the way the provider sends it
pub fn result_payload(tx: &str, verified: &str) -> Value {
    json!({
        "transactionGuid": tx,
        "shortGuid": format!("{tx}-short"),
        "verified": verified,
        "person": {
            "nationalId": "8001015009087",
            "surname": "Doe",
            "forenames": "Jane"
        }
    })
}

/// Positive provider reply for `tx`
pub fn success_reply(tx: &str) -> Value {
    json!({ "success": "true", "data": result_payload(tx, "TRUE") })
}

/// A file part in the `file` field
pub fn file_part(name: &str, content_type: &str) -> FilePart {
    FilePart {
        field: FILE_FIELD.to_string(),
        file: UploadedFile::new(name, content_type, b"document bytes".to_vec()),
    }
}
