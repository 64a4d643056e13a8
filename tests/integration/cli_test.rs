//! CLI tests against a record store on disk

use idverify::adapters::FileRecordStore;
use idverify::core::models::{Person, RecordSource, VerificationRecord, VerificationResult};
use idverify::core::ports::RecordStore;
use predicates::prelude::*;
use tempfile::TempDir;

use super::idverify;

/// A store directory holding one pending record
fn seeded_store(tx: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    let store = FileRecordStore::open(temp.path()).unwrap();
    let record = VerificationRecord::from_result(
        VerificationResult {
            transaction_guid: tx.to_string(),
            short_guid: "S1".to_string(),
            verified: true,
            person: Person::default()
                .with(Person::SURNAME, "Doe")
                .with(Person::FORENAMES, "Jane")
                .with(Person::NATIONAL_ID, 8_001_015_009_087_u64),
        },
        RecordSource::Callback,
        None,
        chrono::Utc::now(),
    );
    store.upsert(&record).unwrap();
    temp
}

fn database_url(temp: &TempDir) -> String {
    format!("file://{}", temp.path().display())
}

#[test]
fn test_version() {
    idverify()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("idverify v{}", env!("CARGO_PKG_VERSION"))));

    idverify()
        .args(["--json", "version"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"version\""));
}

#[test]
fn test_help_lists_commands() {
    idverify()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("approve"))
        .stdout(predicate::str::contains("--base-url"));
}

#[test]
fn test_results_empty_store() {
    let temp = TempDir::new().unwrap();
    idverify()
        .current_dir(temp.path())
        .env("DATABASE_URL", database_url(&temp))
        .arg("results")
        .assert()
        .success()
        .stdout(predicate::str::contains("No verification data available."));
}

#[test]
fn test_results_json() {
    let temp = seeded_store("TX1");
    let output = idverify()
        .current_dir(temp.path())
        .args(["--json", "results", "--database-url", &database_url(&temp)])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["verifications"][0]["transactionGuid"], "TX1");
    assert!(json["verifications"][0]["approved"].is_null());
}

#[test]
fn test_approve_and_show() {
    let temp = seeded_store("TX1");
    let db = database_url(&temp);

    idverify()
        .current_dir(temp.path())
        .args(["approve", "TX1", "--database-url", &db])
        .assert()
        .success()
        .stdout(predicate::str::contains("Verification TX1 approved"));

    idverify()
        .current_dir(temp.path())
        .args(["show", "TX1", "--database-url", &db])
        .assert()
        .success()
        .stdout(predicate::str::contains("Decision:   approved"))
        .stdout(predicate::str::contains("Doe"))
        .stdout(predicate::str::contains("National ID 8001015009087"));

    idverify()
        .current_dir(temp.path())
        .args(["results", "--status", "pending", "--database-url", &db])
        .assert()
        .success()
        .stdout(predicate::str::contains("No pending verifications."));
}

#[test]
fn test_reject_via_env() {
    let temp = seeded_store("TX1");
    idverify()
        .current_dir(temp.path())
        .env("DATABASE_URL", database_url(&temp))
        .args(["reject", "TX1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Verification TX1 rejected"));

    let store = FileRecordStore::open(temp.path()).unwrap();
    let record = store.find("TX1").unwrap().unwrap();
    assert_eq!(record.approved.as_option(), Some(false));
}

#[test]
fn test_approve_unknown_fails() {
    let temp = TempDir::new().unwrap();
    idverify()
        .current_dir(temp.path())
        .args(["approve", "NOPE", "--database-url", &database_url(&temp)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_invalid_status_filter() {
    idverify()
        .args(["results", "--status", "maybe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid status filter"));
}

#[test]
fn test_serve_requires_base_url() {
    let temp = TempDir::new().unwrap();
    idverify()
        .current_dir(temp.path())
        .args(["serve", "--database-url", "memory://", "--port", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("BASE_URL"));
}
