//! Upload storage port

use crate::core::error::StoreError;
use crate::core::models::{DocumentKind, StoredUpload, UploadedFile};

/// Durable storage for uploaded documents
///
/// Files are never removed by the service; cleanup belongs to operators.
pub trait UploadStorage: Send + Sync {
    /// Write the file under a unique name and return where it went
    fn save(&self, file: &UploadedFile, kind: DocumentKind) -> Result<StoredUpload, StoreError>;
}
