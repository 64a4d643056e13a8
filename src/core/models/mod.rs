//! Domain models for idverify
//!
//! Pure data structures with no I/O dependencies.
//!
//! - [`VerificationRecord`] - Durable state for one transaction
//! - [`Approval`] - Admin tri-state decision
//! - [`UploadedFile`] - A document received from a client

mod payload;
mod record;
mod upload;

pub use payload::{MAX_TRANSACTION_GUID_LEN, ResultPayload, VERIFIED_TOKEN};
pub use record::{
    Approval, ApprovalFilter, Person, RecordSource, VerificationRecord, VerificationResult,
};
pub use upload::{DocumentKind, StoredUpload, UploadedFile};
