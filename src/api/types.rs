//! API request and response types
//!
//! All types are framework-agnostic and can be used by any client.

use serde::Serialize;

use super::error::{ApiError, ApiErrorData};
use crate::core::models::VerificationRecord;

// =============================================================================
// RESPONSE ENVELOPE
// =============================================================================

/// Standard API response envelope
///
/// The payload is flattened next to `success`, so a message response
/// serializes as `{"success": true, "message": "..."}` and an error as
/// `{"success": false, "code": "...", "message": "..."}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded
    pub success: bool,
    /// Response data (present on success)
    #[serde(flatten)]
    pub data: Option<T>,
    /// Error details (present on failure)
    #[serde(flatten)]
    pub error: Option<ApiErrorData>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful response
    #[must_use]
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    /// Create an error response
    #[must_use]
    pub fn error(code: &str, message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiErrorData {
                code: code.to_string(),
                message: message.to_string(),
                data: None,
            }),
        }
    }

    /// Create an error response from an API error, keeping its context data
    #[must_use]
    pub fn from_error(error: &ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiErrorData::from(error)),
        }
    }
}

// =============================================================================
// REQUEST TYPES
// =============================================================================

/// Body of `POST /callback/verification`
pub use crate::core::models::ResultPayload as CallbackRequest;

// =============================================================================
// RESPONSE DATA TYPES
// =============================================================================

/// Plain acknowledgement
#[derive(Debug, Serialize)]
pub struct MessageData {
    /// Human-readable outcome
    pub message: String,
}

/// Successful upload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadData {
    /// Human-readable outcome
    pub message: String,
    /// The provider's verification data, unmodified
    pub verification_data: serde_json::Value,
}

/// Record listing
#[derive(Debug, Serialize)]
pub struct VerificationsData {
    /// Records passing the requested filter
    pub verifications: Vec<VerificationRecord>,
}

/// Single record
#[derive(Debug, Serialize)]
pub struct VerificationData {
    /// The record
    pub verification: VerificationRecord,
}

/// Outcome of an approve or reject
#[derive(Debug, Serialize)]
pub struct DecisionData {
    /// Human-readable outcome
    pub message: String,
    /// Record after the decision
    pub verification: VerificationRecord,
}

/// Liveness probe
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HealthData {
    /// Always `"ok"` when the server answers
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
}
