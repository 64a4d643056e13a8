//! Tests for the upload dispatcher
//!
//! Tests field validation, storage side effects, and provider failure handling.

use std::fs;

use crate::common::{StubProvider, file_part, state_with, success_reply};
use idverify::core::VerificationError;
use idverify::core::models::{DocumentKind, RecordSource, UploadedFile};
use idverify::core::ports::{ProviderError, UpsertOutcome};
use idverify::core::services::FilePart;
use serde_json::json;

#[test]
fn test_dispatch_stores_file_and_records_result() {
    let provider = StubProvider::replying(success_reply("TX1"));
    let (state, uploads) = state_with(provider.clone());

    let dispatched = state
        .dispatcher
        .dispatch(vec![file_part("../../passport.PNG", "image/png")])
        .unwrap();

    assert_eq!(dispatched.stored.kind, DocumentKind::Png);
    assert_eq!(dispatched.stored.original_name, "../../passport.PNG");
    assert!(dispatched.stored.path.starts_with(uploads.path()));
    assert_eq!(fs::read(&dispatched.stored.path).unwrap(), b"document bytes");
    assert_eq!(provider.calls()[0].path, dispatched.stored.path);

    assert_eq!(dispatched.upserted.outcome, UpsertOutcome::Created);
    assert_eq!(dispatched.upserted.record.source, RecordSource::Upload);
}

#[test]
fn test_two_uploads_get_distinct_files() {
    let (state, uploads) = state_with(StubProvider::replying(success_reply("TX1")));

    let first = state.dispatcher.dispatch(vec![file_part("id.pdf", "application/pdf")]).unwrap();
    let second = state.dispatcher.dispatch(vec![file_part("id.pdf", "application/pdf")]).unwrap();

    assert_ne!(first.stored.path, second.stored.path);
    assert_eq!(fs::read_dir(uploads.path()).unwrap().count(), 2);
    assert_eq!(second.upserted.outcome, UpsertOutcome::Unchanged);
}

#[test]
fn test_file_in_wrong_field() {
    let (state, _uploads) = state_with(StubProvider::replying(success_reply("TX1")));
    let part = FilePart {
        field: "document".to_string(),
        file: UploadedFile::new("id.pdf", "application/pdf", b"%PDF".to_vec()),
    };

    let err = state.dispatcher.dispatch(vec![part]).unwrap_err();
    assert!(matches!(err, VerificationError::UnexpectedField(field) if field == "document"));
}

#[test]
fn test_two_files_rejected() {
    let (state, uploads) = state_with(StubProvider::replying(success_reply("TX1")));
    let parts = vec![file_part("a.png", "image/png"), file_part("b.png", "image/png")];

    let err = state.dispatcher.dispatch(parts).unwrap_err();
    assert!(matches!(err, VerificationError::UnexpectedField(_)));
    assert_eq!(fs::read_dir(uploads.path()).map(Iterator::count).unwrap_or(0), 0);
}

#[test]
fn test_mislabelled_mime_is_accepted() {
    let (state, _uploads) = state_with(StubProvider::replying(success_reply("TX1")));
    let dispatched = state
        .dispatcher
        .dispatch(vec![file_part("scan.jpg", "image/png")])
        .unwrap();
    assert_eq!(dispatched.stored.kind, DocumentKind::Jpeg);
    assert_eq!(dispatched.upserted.record.transaction_guid, "TX1");
}

#[test]
fn test_success_without_person_is_a_failure() {
    let reply = json!({
        "success": "true",
        "data": { "transactionGuid": "TX1", "shortGuid": "S1", "verified": "TRUE" }
    });
    let (state, _uploads) = state_with(StubProvider::replying(reply.clone()));

    let err = state.dispatcher.dispatch(vec![file_part("id.jpeg", "image/jpeg")]).unwrap_err();
    match err {
        VerificationError::UpstreamVerificationFailure { message, payload } => {
            assert!(message.contains("person"), "{message}");
            assert_eq!(payload, Some(reply));
        },
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(state.reconciler.find("TX1").is_err());
}

#[test]
fn test_success_without_data_is_a_failure() {
    let (state, _uploads) = state_with(StubProvider::replying(json!({ "success": true })));
    let err = state.dispatcher.dispatch(vec![file_part("id.png", "image/png")]).unwrap_err();
    assert!(matches!(err, VerificationError::UpstreamVerificationFailure { .. }));
}

#[test]
fn test_provider_timeout() {
    let provider = StubProvider::failing(ProviderError::Timeout("deadline elapsed".to_string()));
    let (state, uploads) = state_with(provider);

    let err = state.dispatcher.dispatch(vec![file_part("id.png", "image/png")]).unwrap_err();
    assert!(matches!(err, VerificationError::UpstreamUnreachable { timed_out: true, .. }));
    // The document stays on disk
    assert_eq!(fs::read_dir(uploads.path()).unwrap().count(), 1);
}

#[test]
fn test_provider_error_status() {
    let provider = StubProvider::failing(ProviderError::Status {
        status: 503,
        body: "maintenance".to_string(),
    });
    let (state, _uploads) = state_with(provider);

    let err = state.dispatcher.dispatch(vec![file_part("id.png", "image/png")]).unwrap_err();
    assert!(matches!(err, VerificationError::UpstreamUnreachable { timed_out: false, .. }));
}
