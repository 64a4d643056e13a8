//! Domain errors for the verification workflow

use thiserror::Error;

/// Failures a verification request can end in
#[derive(Debug, Error)]
pub enum VerificationError {
    /// The request carried no `file` field
    #[error("No file uploaded")]
    NoFileUploaded,

    /// The request carried more than one file field
    #[error("Unexpected field: {0}")]
    UnexpectedField(String),

    /// Mime type or extension is not an accepted document type
    #[error("Invalid file type '{file_name}' ({content_type}). Only jpeg, jpg, png, or pdf allowed.")]
    InvalidFileType {
        /// Original filename
        file_name: String,
        /// Declared mime type
        content_type: String,
    },

    /// A result payload lacks a required field
    #[error("Incomplete verification data: missing {0}")]
    IncompleteData(&'static str),

    /// The transaction GUID is longer than the store accepts
    #[error("Transaction GUID too long ({0} bytes)")]
    GuidTooLong(usize),

    /// No record exists for the transaction
    #[error("Verification '{0}' not found")]
    NotFound(String),

    /// The provider answered but reported a failed verification
    #[error("Verification failed: {message}")]
    UpstreamVerificationFailure {
        /// Why the verification was considered failed
        message: String,
        /// Raw provider reply, if any
        payload: Option<serde_json::Value>,
    },

    /// The provider could not be reached or answered garbage
    #[error("Verification service unreachable: {message}")]
    UpstreamUnreachable {
        /// Underlying transport error
        message: String,
        /// Whether the call ran into the configured timeout
        timed_out: bool,
    },

    /// Writing the upload or the record failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StoreError> for VerificationError {
    fn from(err: StoreError) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Errors raised by record store and upload storage adapters
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem failure
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document could not be (de)serialized
    #[error("corrupt record {key}: {source}")]
    Corrupt {
        /// File or key of the broken document
        key: String,
        /// Underlying serde error
        source: serde_json::Error,
    },

    /// A lock was poisoned by a panicking writer
    #[error("store lock poisoned")]
    Poisoned,
}
