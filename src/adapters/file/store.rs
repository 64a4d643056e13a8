//! Refs-style record storage
//!
//! Stores each record as its own file, like git refs:
//! - `<root>/records/<hex(transactionGuid)>.json` - record data
//! - `<root>/locks/<hex(transactionGuid)>.lock` - writer lock for that record
//!
//! Writes go to a temporary file in the same directory and are renamed into
//! place, so readers never see a half-written record. Read-modify-write cycles
//! hold the key's file lock, so separate processes sharing the directory do
//! not lose each other's updates.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::locks::KeyLocks;
use crate::core::StoreError;
use crate::core::models::{Approval, VerificationRecord};
use crate::core::ports::{RecordStore, UpsertOutcome, Upserted, sort_for_listing};

const RECORDS_DIR: &str = "records";
const RECORD_EXT: &str = "json";

/// Record store backed by a directory of JSON files
#[derive(Debug)]
pub struct FileRecordStore {
    records_dir: PathBuf,
    locks: KeyLocks,
}

impl FileRecordStore {
    /// Open (and create if needed) a store rooted at `root`
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref();
        let records_dir = root.join(RECORDS_DIR);
        fs::create_dir_all(&records_dir)?;
        Ok(Self {
            records_dir,
            locks: KeyLocks::open(root)?,
        })
    }

    /// Directory holding the record files
    #[must_use]
    pub fn records_dir(&self) -> &Path {
        &self.records_dir
    }

    /// Transaction GUIDs come from outside; hex keeps any value a safe filename.
    fn file_stem(transaction_guid: &str) -> String {
        hex::encode(transaction_guid.as_bytes())
    }

    fn record_path(&self, file_stem: &str) -> PathBuf {
        self.records_dir.join(format!("{file_stem}.{RECORD_EXT}"))
    }

    fn read(path: &Path) -> Result<Option<VerificationRecord>, StoreError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: path.display().to_string(),
                source,
            })
    }

    fn write(&self, path: &Path, record: &VerificationRecord) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(record).map_err(|source| StoreError::Corrupt {
            key: record.transaction_guid.clone(),
            source,
        })?;
        let mut tmp = NamedTempFile::new_in(&self.records_dir)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

impl RecordStore for FileRecordStore {
    fn upsert(&self, record: &VerificationRecord) -> Result<Upserted, StoreError> {
        let stem = Self::file_stem(&record.transaction_guid);
        let _lock = self.locks.lock(&stem)?;

        let path = self.record_path(&stem);
        let (outcome, stored) = match Self::read(&path)? {
            None => {
                self.write(&path, record)?;
                (UpsertOutcome::Created, record.clone())
            },
            Some(mut existing) => {
                if existing.merge_from(record) {
                    self.write(&path, &existing)?;
                    (UpsertOutcome::Updated, existing)
                } else {
                    (UpsertOutcome::Unchanged, existing)
                }
            },
        };

        Ok(Upserted {
            outcome,
            record: stored,
        })
    }

    fn find(&self, transaction_guid: &str) -> Result<Option<VerificationRecord>, StoreError> {
        Self::read(&self.record_path(&Self::file_stem(transaction_guid)))
    }

    fn list(&self) -> Result<Vec<VerificationRecord>, StoreError> {
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.records_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXT) {
                continue;
            }
            if let Some(record) = Self::read(&path)? {
                records.push(record);
            }
        }
        sort_for_listing(&mut records);
        Ok(records)
    }

    fn set_approval(
        &self,
        transaction_guid: &str,
        approval: Approval,
    ) -> Result<Option<VerificationRecord>, StoreError> {
        let stem = Self::file_stem(transaction_guid);
        let path = self.record_path(&stem);
        if !path.exists() {
            return Ok(None);
        }
        let _lock = self.locks.lock(&stem)?;

        let Some(mut record) = Self::read(&path)? else {
            return Ok(None);
        };
        record.approved = approval;
        self.write(&path, &record)?;
        Ok(Some(record))
    }
}
