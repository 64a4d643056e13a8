//! Verification provider port
//!
//! The external service that inspects an identity document.

use thiserror::Error;

use crate::core::models::StoredUpload;

/// Raw answer from the provider
///
/// `success` is kept as the JSON value the provider sent; the provider uses
/// the string `"true"` rather than a boolean.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderReply {
    /// Whole reply body
    pub body: serde_json::Value,
}

impl ProviderReply {
    /// Whether the provider reported a positive outcome
    #[must_use]
    pub fn is_success(&self) -> bool {
        match self.body.get("success") {
            Some(serde_json::Value::String(s)) => s == "true",
            Some(serde_json::Value::Bool(b)) => *b,
            _ => false,
        }
    }

    /// The `data` object carrying the verification result
    #[must_use]
    pub fn data(&self) -> Option<&serde_json::Value> {
        self.body.get("data").filter(|d| !d.is_null())
    }
}

/// Transport-level failure talking to the provider
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The call did not finish within the configured timeout
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Connection or protocol failure
    #[error("request failed: {0}")]
    Transport(String),

    /// Provider answered with a non-2xx status
    #[error("provider responded with status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// Provider answered with something that is not JSON
    #[error("invalid provider response: {0}")]
    Decode(String),

    /// The stored upload could not be read back
    #[error("could not read upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Forwards documents to the external verification service
pub trait VerificationProvider: Send + Sync {
    /// Submit a stored document and wait for the provider's answer
    fn submit(&self, upload: &StoredUpload) -> Result<ProviderReply, ProviderError>;
}
