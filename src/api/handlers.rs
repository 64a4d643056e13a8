//! Pure API handlers
//!
//! These handlers contain the request logic and are HTTP-agnostic.
//! They take typed input and return `Result<T, ApiError>`.

use crate::core::models::ApprovalFilter;
use crate::core::services::FilePart;

use super::error::ApiError;
use super::state::AppState;
use super::types::{
    CallbackRequest, DecisionData, HealthData, MessageData, UploadData, VerificationData,
    VerificationsData,
};

// =============================================================================
// UPLOAD
// =============================================================================

/// Accept an identity document and verify it
pub fn upload(state: &AppState, parts: Vec<FilePart>) -> Result<UploadData, ApiError> {
    let dispatched = state.dispatcher.dispatch(parts)?;
    Ok(UploadData {
        message: "File uploaded and verified successfully".to_string(),
        verification_data: dispatched.verification_data,
    })
}

// =============================================================================
// CALLBACK
// =============================================================================

/// Record a result pushed by the verification provider
pub fn receive_callback(state: &AppState, req: &CallbackRequest) -> Result<MessageData, ApiError> {
    log::info!(
        "Received callback verification for {}",
        req.transaction_guid.as_deref().unwrap_or("<missing>")
    );
    let upserted = state.reconciler.record_from_callback(req).inspect_err(|e| {
        log::warn!("Callback rejected: {e}");
    })?;
    log::debug!("Callback {} -> {:?}", upserted.record.transaction_guid, upserted.outcome);
    Ok(MessageData {
        message: "Verification saved successfully".to_string(),
    })
}

// =============================================================================
// ADMIN
// =============================================================================

/// List verification records, optionally filtered by decision
pub fn list_results(state: &AppState, status: Option<&str>) -> Result<VerificationsData, ApiError> {
    let filter = match status {
        Some(s) => s.parse::<ApprovalFilter>().map_err(ApiError::bad_request)?,
        None => ApprovalFilter::All,
    };
    let verifications = state.reconciler.list(filter)?;
    Ok(VerificationsData { verifications })
}

/// Get a single verification record
pub fn get_result(state: &AppState, transaction_guid: &str) -> Result<VerificationData, ApiError> {
    let verification = state.reconciler.find(transaction_guid)?;
    Ok(VerificationData { verification })
}

/// Approve a verification
pub fn approve(state: &AppState, transaction_guid: &str) -> Result<DecisionData, ApiError> {
    let verification = state.reconciler.approve(transaction_guid)?;
    Ok(DecisionData {
        message: format!("Verification {transaction_guid} approved"),
        verification,
    })
}

/// Reject a verification
pub fn reject(state: &AppState, transaction_guid: &str) -> Result<DecisionData, ApiError> {
    let verification = state.reconciler.reject(transaction_guid)?;
    Ok(DecisionData {
        message: format!("Verification {transaction_guid} rejected"),
        verification,
    })
}

// =============================================================================
// HEALTH
// =============================================================================

/// Liveness probe
#[must_use]
pub const fn health() -> HealthData {
    HealthData {
        status: "ok",
        version: crate::VERSION,
    }
}
