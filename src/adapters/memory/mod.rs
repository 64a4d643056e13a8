//! In-memory record storage
//!
//! Used for `memory://` database URLs and in tests. Nothing survives a restart.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::core::StoreError;
use crate::core::models::{Approval, VerificationRecord};
use crate::core::ports::{RecordStore, UpsertOutcome, Upserted, sort_for_listing};

/// Record store keeping everything in a map behind one mutex
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Mutex<HashMap<String, VerificationRecord>>,
}

impl MemoryRecordStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn upsert(&self, record: &VerificationRecord) -> Result<Upserted, StoreError> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        let upserted = match records.get_mut(&record.transaction_guid) {
            None => {
                records.insert(record.transaction_guid.clone(), record.clone());
                Upserted {
                    outcome: UpsertOutcome::Created,
                    record: record.clone(),
                }
            },
            Some(existing) => {
                let outcome = if existing.merge_from(record) {
                    UpsertOutcome::Updated
                } else {
                    UpsertOutcome::Unchanged
                };
                Upserted {
                    outcome,
                    record: existing.clone(),
                }
            },
        };
        Ok(upserted)
    }

    fn find(&self, transaction_guid: &str) -> Result<Option<VerificationRecord>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get(transaction_guid).cloned())
    }

    fn list(&self) -> Result<Vec<VerificationRecord>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        let mut all: Vec<_> = records.values().cloned().collect();
        sort_for_listing(&mut all);
        Ok(all)
    }

    fn set_approval(
        &self,
        transaction_guid: &str,
        approval: Approval,
    ) -> Result<Option<VerificationRecord>, StoreError> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.get_mut(transaction_guid).map(|record| {
            record.approved = approval;
            record.clone()
        }))
    }
}
