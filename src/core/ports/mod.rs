//! Port traits (interfaces) for external dependencies
//!
//! These traits define the boundaries between the verification workflow
//! and external systems (record storage, disk, the verification provider).
//!
//! Implementations live in the `adapters` module.
//!
//! ## Design Principle
//!
//! The services depend only on these traits, never on concrete
//! implementations, so tests can swap in in-memory stores and stub providers.

mod provider;
mod record_store;
mod upload_storage;

pub use provider::{ProviderError, ProviderReply, VerificationProvider};
pub use record_store::{RecordStore, UpsertOutcome, Upserted, sort_for_listing};
pub use upload_storage::UploadStorage;
