//! Record store port
//!
//! Defines the interface for persisting verification records.

use crate::core::error::StoreError;
use crate::core::models::{Approval, VerificationRecord};

/// What an upsert did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No record existed; one was created
    Created,
    /// An existing record took the new verification fields
    Updated,
    /// An existing record already held the same data
    Unchanged,
}

/// Result of an upsert: what happened and the record as now stored
#[derive(Debug, Clone, PartialEq)]
pub struct Upserted {
    /// What the upsert did
    pub outcome: UpsertOutcome,
    /// Stored state after the write
    pub record: VerificationRecord,
}

/// Durable mapping from transaction GUID to verification record
///
/// Implementations must serialize writes per transaction GUID: a concurrent
/// `upsert` and `set_approval` on the same key both take effect, in some order,
/// and never produce a second record.
pub trait RecordStore: Send + Sync {
    /// Insert a record, or merge it into the existing one with the same key
    ///
    /// Merging follows [`VerificationRecord::merge_from`].
    fn upsert(&self, record: &VerificationRecord) -> Result<Upserted, StoreError>;

    /// Look up a record by transaction GUID
    fn find(&self, transaction_guid: &str) -> Result<Option<VerificationRecord>, StoreError>;

    /// All records, oldest response first
    fn list(&self) -> Result<Vec<VerificationRecord>, StoreError>;

    /// Record an admin decision
    ///
    /// Returns the updated record, or `None` if the key is unknown.
    fn set_approval(
        &self,
        transaction_guid: &str,
        approval: Approval,
    ) -> Result<Option<VerificationRecord>, StoreError>;
}

/// Order records the way listings present them
pub fn sort_for_listing(records: &mut [VerificationRecord]) {
    records.sort_by(|a, b| {
        (a.response_timestamp, &a.transaction_guid).cmp(&(b.response_timestamp, &b.transaction_guid))
    });
}
