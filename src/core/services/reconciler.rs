//! Reconciler - turns verification results and admin actions into records
//!
//! Per transaction GUID the lifecycle is:
//!
//! ```text
//! Unseen --(upload result | callback)--> Recorded --(approve | reject)--> Approved | Rejected
//! ```
//!
//! Both result paths go through the same upsert, so a transaction reported by
//! the upload response and again by the callback ends up as one record.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::core::error::VerificationError;
use crate::core::models::{
    Approval, ApprovalFilter, MAX_TRANSACTION_GUID_LEN, RecordSource, ResultPayload,
    VerificationRecord, VerificationResult,
};
use crate::core::ports::{RecordStore, Upserted};

/// Applies verification results and admin decisions to the record store
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn RecordStore>,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler").finish_non_exhaustive()
    }
}

impl Reconciler {
    /// Create a reconciler over a store
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Record a result returned synchronously by an upload
    pub fn record_from_upload(
        &self,
        result: VerificationResult,
        requested_at: DateTime<Utc>,
    ) -> Result<Upserted, VerificationError> {
        let record =
            VerificationRecord::from_result(result, RecordSource::Upload, Some(requested_at), Utc::now());
        self.upsert(&record)
    }

    /// Record a result delivered to the callback endpoint
    ///
    /// Fails with `IncompleteData` before touching the store if a required
    /// field is missing.
    pub fn record_from_callback(&self, payload: &ResultPayload) -> Result<Upserted, VerificationError> {
        let result = payload.validate()?;
        let record = VerificationRecord::from_result(result, RecordSource::Callback, None, Utc::now());
        self.upsert(&record)
    }

    fn upsert(&self, record: &VerificationRecord) -> Result<Upserted, VerificationError> {
        let upserted = self.store.upsert(record).map_err(|e| {
            log::error!("Failed to store verification {}: {e}", record.transaction_guid);
            VerificationError::from(e)
        })?;
        log::info!(
            "Verification {} from {}: {:?} (verified: {})",
            upserted.record.transaction_guid,
            record.source,
            upserted.outcome,
            upserted.record.verified
        );
        Ok(upserted)
    }

    /// Approve a recorded verification
    pub fn approve(&self, transaction_guid: &str) -> Result<VerificationRecord, VerificationError> {
        self.decide(transaction_guid, Approval::Approved)
    }

    /// Reject a recorded verification
    pub fn reject(&self, transaction_guid: &str) -> Result<VerificationRecord, VerificationError> {
        self.decide(transaction_guid, Approval::Rejected)
    }

    fn decide(
        &self,
        transaction_guid: &str,
        approval: Approval,
    ) -> Result<VerificationRecord, VerificationError> {
        if !storable(transaction_guid) {
            return Err(VerificationError::NotFound(transaction_guid.to_string()));
        }
        let record = self
            .store
            .set_approval(transaction_guid, approval)?
            .ok_or_else(|| VerificationError::NotFound(transaction_guid.to_string()))?;

        if approval == Approval::Approved && !record.verified {
            log::warn!("Verification {transaction_guid} approved although the provider did not verify it");
        }
        log::info!("Verification {transaction_guid} {approval}");
        Ok(record)
    }

    /// Look up a single record
    pub fn find(&self, transaction_guid: &str) -> Result<VerificationRecord, VerificationError> {
        if !storable(transaction_guid) {
            return Err(VerificationError::NotFound(transaction_guid.to_string()));
        }
        self.store
            .find(transaction_guid)?
            .ok_or_else(|| VerificationError::NotFound(transaction_guid.to_string()))
    }

    /// List records passing a filter
    pub fn list(&self, filter: ApprovalFilter) -> Result<Vec<VerificationRecord>, VerificationError> {
        let mut records = self.store.list()?;
        records.retain(|r| filter.matches(r));
        Ok(records)
    }
}

/// Keys longer than a stored GUID can be cannot name a record
fn storable(transaction_guid: &str) -> bool {
    transaction_guid.len() <= MAX_TRANSACTION_GUID_LEN
}
