//! Tests for record storage
//!
//! The same contract is run against the file and in-memory stores.

use std::fs;
use std::sync::Arc;
use std::thread;

use chrono::{Duration, Utc};
use idverify::adapters::{FileRecordStore, MemoryRecordStore};
use idverify::core::models::{Approval, Person, RecordSource, VerificationRecord, VerificationResult};
use idverify::core::ports::{RecordStore, UpsertOutcome};
use tempfile::TempDir;

fn record(tx: &str, verified: bool, age_secs: i64) -> VerificationRecord {
    VerificationRecord::from_result(
        VerificationResult {
            transaction_guid: tx.to_string(),
            short_guid: format!("{tx}-short"),
            verified,
            person: Person::default().with(Person::SURNAME, "Doe"),
        },
        RecordSource::Callback,
        None,
        Utc::now() - Duration::seconds(age_secs),
    )
}

fn check_upsert_and_decide(store: &dyn RecordStore) {
    let created = store.upsert(&record("TX1", false, 0)).unwrap();
    assert_eq!(created.outcome, UpsertOutcome::Created);

    let decided = store.set_approval("TX1", Approval::Rejected).unwrap().unwrap();
    assert_eq!(decided.approved, Approval::Rejected);

    let updated = store.upsert(&record("TX1", true, 0)).unwrap();
    assert_eq!(updated.outcome, UpsertOutcome::Updated);
    assert!(updated.record.verified);
    assert_eq!(updated.record.approved, Approval::Rejected);

    let unchanged = store.upsert(&record("TX1", true, 0)).unwrap();
    assert_eq!(unchanged.outcome, UpsertOutcome::Unchanged);

    assert_eq!(store.find("TX1").unwrap(), Some(updated.record));
    assert_eq!(store.list().unwrap().len(), 1);
}

fn check_unknown_keys(store: &dyn RecordStore) {
    assert_eq!(store.find("missing").unwrap(), None);
    assert_eq!(store.set_approval("missing", Approval::Approved).unwrap(), None);
    assert!(store.list().unwrap().is_empty());
}

fn check_listing_order(store: &dyn RecordStore) {
    store.upsert(&record("newest", true, 0)).unwrap();
    store.upsert(&record("oldest", true, 120)).unwrap();
    store.upsert(&record("middle", true, 60)).unwrap();

    let ids: Vec<_> = store
        .list()
        .unwrap()
        .into_iter()
        .map(|r| r.transaction_guid)
        .collect();
    assert_eq!(ids, vec!["oldest", "middle", "newest"]);
}

#[test]
fn test_memory_store_contract() {
    check_upsert_and_decide(&MemoryRecordStore::new());
    check_unknown_keys(&MemoryRecordStore::new());
    check_listing_order(&MemoryRecordStore::new());
}

#[test]
fn test_file_store_contract() {
    for check in [check_upsert_and_decide, check_unknown_keys, check_listing_order] {
        let temp = TempDir::new().unwrap();
        check(&FileRecordStore::open(temp.path()).unwrap());
    }
}

#[test]
fn test_file_store_survives_reopen() {
    let temp = TempDir::new().unwrap();
    {
        let store = FileRecordStore::open(temp.path()).unwrap();
        store.upsert(&record("TX1", true, 0)).unwrap();
        store.set_approval("TX1", Approval::Approved).unwrap();
    }

    let reopened = FileRecordStore::open(temp.path()).unwrap();
    let found = reopened.find("TX1").unwrap().unwrap();
    assert_eq!(found.approved, Approval::Approved);
    assert!(found.verified);
}

#[test]
fn test_file_store_record_format() {
    let temp = TempDir::new().unwrap();
    let store = FileRecordStore::open(temp.path()).unwrap();
    store.upsert(&record("TX/1", true, 0)).unwrap();

    let files: Vec<_> = fs::read_dir(store.records_dir())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&files[0]).unwrap()).unwrap();
    assert_eq!(json["transactionGuid"], "TX/1");
    assert_eq!(json["shortGuid"], "TX/1-short");
    assert!(json["approved"].is_null());
    assert_eq!(json["source"], "callback");
}

#[test]
fn test_file_store_ignores_foreign_files() {
    let temp = TempDir::new().unwrap();
    let store = FileRecordStore::open(temp.path()).unwrap();
    store.upsert(&record("TX1", true, 0)).unwrap();
    fs::write(store.records_dir().join("README.txt"), "not a record").unwrap();

    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn test_file_store_reports_corrupt_records() {
    let temp = TempDir::new().unwrap();
    let store = FileRecordStore::open(temp.path()).unwrap();
    fs::write(store.records_dir().join("broken.json"), "{ not json").unwrap();

    assert!(store.list().is_err());
}

#[test]
fn test_concurrent_upsert_and_approve_keep_one_record() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(FileRecordStore::open(temp.path()).unwrap());
    store.upsert(&record("TX1", false, 0)).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                if i % 2 == 0 {
                    store.upsert(&record("TX1", i % 4 == 0, 0)).unwrap();
                } else {
                    store.set_approval("TX1", Approval::Approved).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let records = store.list().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].approved, Approval::Approved);
}
