//! Verification record model
//!
//! One record per transaction GUID. The record is the only place where the
//! upload path and the callback path meet.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Admin decision on a record
///
/// Serialized as `null` / `true` / `false` so listings always carry the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Approval {
    /// No decision yet
    #[default]
    Unset,
    /// Approved by an admin
    Approved,
    /// Rejected by an admin
    Rejected,
}

impl Approval {
    /// Tri-state view as an optional boolean
    #[must_use]
    pub const fn as_option(self) -> Option<bool> {
        match self {
            Self::Unset => None,
            Self::Approved => Some(true),
            Self::Rejected => Some(false),
        }
    }
}

impl From<Option<bool>> for Approval {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => Self::Unset,
            Some(true) => Self::Approved,
            Some(false) => Self::Rejected,
        }
    }
}

impl Serialize for Approval {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_option().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Approval {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<bool>::deserialize(deserializer).map(Self::from)
    }
}

impl std::fmt::Display for Approval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unset => f.pad("pending"),
            Self::Approved => f.pad("approved"),
            Self::Rejected => f.pad("rejected"),
        }
    }
}

/// Which path first recorded a verification result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSource {
    /// Synchronous result from the upload response
    Upload,
    /// Asynchronous result from the callback endpoint
    Callback,
}

impl std::fmt::Display for RecordSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upload => write!(f, "upload"),
            Self::Callback => write!(f, "callback"),
        }
    }
}

/// Identity details reported by the verification provider
///
/// Stored exactly as received. The provider decides the field names and their
/// JSON types, so a numeric `nationalId` or a `null` `cardId` survive as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Person(Map<String, Value>);

impl Person {
    /// Field holding the national identity number
    pub const NATIONAL_ID: &'static str = "nationalId";
    /// Field holding the identity card number
    pub const CARD_ID: &'static str = "cardId";
    /// Field holding the family name
    pub const SURNAME: &'static str = "surname";
    /// Field holding the given names
    pub const FORENAMES: &'static str = "forenames";

    /// Add or replace a field
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Raw value of a field
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// A field rendered for display, `None` when absent or `null`
    #[must_use]
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl From<Map<String, Value>> for Person {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// A validated verification result, ready to be recorded
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationResult {
    /// Join key across upload and callback paths
    pub transaction_guid: String,
    /// Short identifier issued alongside the transaction GUID
    pub short_guid: String,
    /// Outcome of the provider's check
    pub verified: bool,
    /// Identity details
    pub person: Person,
}

/// Durable verification state for one transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRecord {
    /// Unique key
    pub transaction_guid: String,
    /// Short identifier
    pub short_guid: String,
    /// Provider outcome
    pub verified: bool,
    /// Admin decision
    #[serde(default)]
    pub approved: Approval,
    /// Identity details
    pub person: Person,
    /// When the document was sent to the provider
    #[serde(default)]
    pub request_timestamp: Option<DateTime<Utc>>,
    /// When the provider's result was received
    #[serde(default)]
    pub response_timestamp: Option<DateTime<Utc>>,
    /// Path that first recorded this result
    pub source: RecordSource,
}

impl VerificationRecord {
    /// Build a fresh, undecided record from a provider result
    #[must_use]
    pub fn from_result(
        result: VerificationResult,
        source: RecordSource,
        requested_at: Option<DateTime<Utc>>,
        received_at: DateTime<Utc>,
    ) -> Self {
        Self {
            transaction_guid: result.transaction_guid,
            short_guid: result.short_guid,
            verified: result.verified,
            approved: Approval::Unset,
            person: result.person,
            request_timestamp: requested_at,
            response_timestamp: Some(received_at),
            source,
        }
    }

    /// Fold a newer result for the same transaction into this record.
    ///
    /// Verification fields take the incoming values. The admin decision, the
    /// original source and the earliest request timestamp are kept. Returns
    /// `false` when nothing but the response timestamp would change, in which
    /// case the record is left untouched.
    pub fn merge_from(&mut self, incoming: &Self) -> bool {
        let request_timestamp = match (self.request_timestamp, incoming.request_timestamp) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };

        let changed = self.short_guid != incoming.short_guid
            || self.verified != incoming.verified
            || self.person != incoming.person
            || self.request_timestamp != request_timestamp;
        if !changed {
            return false;
        }

        self.short_guid.clone_from(&incoming.short_guid);
        self.verified = incoming.verified;
        self.person = incoming.person.clone();
        self.request_timestamp = request_timestamp;
        self.response_timestamp = incoming.response_timestamp.or(self.response_timestamp);
        true
    }
}

/// Filter for record listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApprovalFilter {
    /// Every record
    #[default]
    All,
    /// Records without an admin decision
    Pending,
    /// Approved records
    Approved,
    /// Rejected records
    Rejected,
}

impl ApprovalFilter {
    /// Whether a record passes this filter
    #[must_use]
    pub const fn matches(self, record: &VerificationRecord) -> bool {
        match self {
            Self::All => true,
            Self::Pending => matches!(record.approved, Approval::Unset),
            Self::Approved => matches!(record.approved, Approval::Approved),
            Self::Rejected => matches!(record.approved, Approval::Rejected),
        }
    }
}

impl std::str::FromStr for ApprovalFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(format!(
                "Invalid status filter: {s}. Use: all, pending, approved, rejected"
            )),
        }
    }
}

impl std::fmt::Display for ApprovalFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}
