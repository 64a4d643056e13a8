//! Result payloads as the provider sends them
//!
//! The same shape arrives in the `data` field of an upload response and as the
//! body of a callback. Every field is optional on the wire; validation turns a
//! payload into a [`VerificationResult`].

use serde::{Deserialize, Serialize};

use super::record::{Person, VerificationResult};
use crate::core::error::VerificationError;

/// Literal flag the provider uses for a positive verification
pub const VERIFIED_TOKEN: &str = "TRUE";

/// Longest accepted transaction GUID, in bytes
pub const MAX_TRANSACTION_GUID_LEN: usize = 100;

/// Unvalidated verification result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPayload {
    /// Join key
    #[serde(default)]
    pub transaction_guid: Option<String>,
    /// Short identifier
    #[serde(default)]
    pub short_guid: Option<String>,
    /// `"TRUE"` when verified, anything else otherwise
    #[serde(default)]
    pub verified: Option<serde_json::Value>,
    /// Identity details
    #[serde(default)]
    pub person: Option<Person>,
}

impl ResultPayload {
    /// Whether the verified flag is exactly the `"TRUE"` token
    #[must_use]
    pub fn is_verified(&self) -> bool {
        matches!(&self.verified, Some(serde_json::Value::String(s)) if s == VERIFIED_TOKEN)
    }

    /// Check required fields and build a result
    ///
    /// Empty strings count as missing.
    pub fn validate(&self) -> Result<VerificationResult, VerificationError> {
        let transaction_guid = non_empty(self.transaction_guid.as_deref())
            .ok_or(VerificationError::IncompleteData("transactionGuid"))?;
        if transaction_guid.len() > MAX_TRANSACTION_GUID_LEN {
            return Err(VerificationError::GuidTooLong(transaction_guid.len()));
        }
        let short_guid = non_empty(self.short_guid.as_deref())
            .ok_or(VerificationError::IncompleteData("shortGuid"))?;
        let person = self
            .person
            .clone()
            .ok_or(VerificationError::IncompleteData("person"))?;

        Ok(VerificationResult {
            transaction_guid: transaction_guid.to_string(),
            short_guid: short_guid.to_string(),
            verified: self.is_verified(),
            person,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
