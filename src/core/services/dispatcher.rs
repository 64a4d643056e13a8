//! Upload dispatcher - from client file to recorded verification
//!
//! Validates the upload, writes it to storage, hands it to the verification
//! provider and routes a positive answer to the [`Reconciler`]. The stored
//! file is left in place whatever the outcome.

use std::sync::Arc;

use chrono::Utc;

use crate::core::error::VerificationError;
use crate::core::models::{ResultPayload, StoredUpload, UploadedFile};
use crate::core::ports::{ProviderError, Upserted, UploadStorage, VerificationProvider};

use super::reconciler::Reconciler;

/// Form field that must carry the document
pub const FILE_FIELD: &str = "file";

/// A file part of an upload form, with the field it arrived in
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Form field name
    pub field: String,
    /// File content and metadata
    pub file: UploadedFile,
}

/// Successful upload
#[derive(Debug, Clone)]
pub struct Dispatched {
    /// Where the document was stored
    pub stored: StoredUpload,
    /// The provider's `data` object, passed back to the client as-is
    pub verification_data: serde_json::Value,
    /// Record state after reconciliation
    pub upserted: Upserted,
}

/// Runs the upload pipeline
#[derive(Clone)]
pub struct UploadDispatcher {
    storage: Arc<dyn UploadStorage>,
    provider: Arc<dyn VerificationProvider>,
    reconciler: Reconciler,
}

impl std::fmt::Debug for UploadDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadDispatcher")
            .field("reconciler", &self.reconciler)
            .finish_non_exhaustive()
    }
}

impl UploadDispatcher {
    /// Wire a dispatcher from its collaborators
    #[must_use]
    pub fn new(
        storage: Arc<dyn UploadStorage>,
        provider: Arc<dyn VerificationProvider>,
        reconciler: Reconciler,
    ) -> Self {
        Self {
            storage,
            provider,
            reconciler,
        }
    }

    /// Process the file parts of one upload request
    pub fn dispatch(&self, parts: Vec<FilePart>) -> Result<Dispatched, VerificationError> {
        let file = single_file(parts)?;

        let Some(kind) = file.kind() else {
            log::warn!("Rejected upload '{}' ({})", file.file_name, file.content_type);
            return Err(VerificationError::InvalidFileType {
                file_name: file.file_name,
                content_type: file.content_type,
            });
        };

        let stored = self.storage.save(&file, kind).map_err(|e| {
            log::error!("Failed to store upload '{}': {e}", file.file_name);
            VerificationError::from(e)
        })?;
        log::info!("File received: {} -> {}", stored.original_name, stored.path.display());

        let requested_at = Utc::now();
        let reply = self.provider.submit(&stored).map_err(|e| {
            log::warn!("Verification call for {} failed: {e}", stored.path.display());
            upstream_unreachable(e)
        })?;

        if !reply.is_success() {
            log::warn!("Verification rejected for {}: {}", stored.path.display(), reply.body);
            return Err(VerificationError::UpstreamVerificationFailure {
                message: "Verification failed".to_string(),
                payload: Some(reply.body),
            });
        }

        let Some(data) = reply.data().cloned() else {
            return Err(incomplete_reply(&reply.body, "data"));
        };
        let payload: ResultPayload = serde_json::from_value(data.clone())
            .map_err(|e| VerificationError::UpstreamVerificationFailure {
                message: format!("Malformed verification data: {e}"),
                payload: Some(reply.body.clone()),
            })?;
        let result = payload.validate().map_err(|e| match e {
            VerificationError::IncompleteData(field) => incomplete_reply(&reply.body, field),
            other @ VerificationError::GuidTooLong(_) => VerificationError::UpstreamVerificationFailure {
                message: other.to_string(),
                payload: Some(reply.body.clone()),
            },
            other => other,
        })?;

        let upserted = self.reconciler.record_from_upload(result, requested_at)?;

        Ok(Dispatched {
            stored,
            verification_data: data,
            upserted,
        })
    }
}

fn single_file(parts: Vec<FilePart>) -> Result<UploadedFile, VerificationError> {
    let mut found = None;
    for part in parts {
        if part.field != FILE_FIELD || found.is_some() {
            return Err(VerificationError::UnexpectedField(part.field));
        }
        found = Some(part.file);
    }
    found.ok_or(VerificationError::NoFileUploaded)
}

fn upstream_unreachable(err: ProviderError) -> VerificationError {
    match err {
        ProviderError::Io(e) => VerificationError::Storage(format!("could not read upload: {e}")),
        ProviderError::Timeout(_) => VerificationError::UpstreamUnreachable {
            message: err.to_string(),
            timed_out: true,
        },
        other => VerificationError::UpstreamUnreachable {
            message: other.to_string(),
            timed_out: false,
        },
    }
}

fn incomplete_reply(body: &serde_json::Value, field: &str) -> VerificationError {
    VerificationError::UpstreamVerificationFailure {
        message: format!("Verification service returned incomplete data: missing {field}"),
        payload: Some(body.clone()),
    }
}
