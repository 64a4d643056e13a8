//! API error types with HTTP status code mapping

use serde::Serialize;

use crate::core::VerificationError;

/// Error codes that map to HTTP status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,
    /// Malformed request (400)
    BadRequest,
    /// Upload without a `file` field (400)
    NoFileUploaded,
    /// Upload with a file in an unexpected field (400)
    UnexpectedField,
    /// Upload that is not an accepted document type (400)
    InvalidFileType,
    /// Verification payload missing required fields (400)
    IncompleteData,
    /// Provider reported a failed verification (502)
    VerificationFailed,
    /// Provider could not be reached (502)
    UpstreamUnreachable,
    /// Provider did not answer in time (504)
    UpstreamTimeout,
    /// Persisting the upload or the record failed (500)
    StorageError,
    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::BadRequest
            | Self::NoFileUploaded
            | Self::UnexpectedField
            | Self::InvalidFileType
            | Self::IncompleteData => 400,
            Self::VerificationFailed | Self::UpstreamUnreachable => 502,
            Self::UpstreamTimeout => 504,
            Self::StorageError | Self::Internal => 500,
        }
    }

    /// Get the error code string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::BadRequest => "BAD_REQUEST",
            Self::NoFileUploaded => "NO_FILE_UPLOADED",
            Self::UnexpectedField => "UNEXPECTED_FIELD",
            Self::InvalidFileType => "INVALID_FILE_TYPE",
            Self::IncompleteData => "INCOMPLETE_DATA",
            Self::VerificationFailed => "VERIFICATION_FAILED",
            Self::UpstreamUnreachable => "UPSTREAM_UNREACHABLE",
            Self::UpstreamTimeout => "UPSTREAM_TIMEOUT",
            Self::StorageError => "STORAGE_ERROR",
            Self::Internal => "INTERNAL_ERROR",
        }
    }
}

/// API error with code and message
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Error code (determines HTTP status)
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Extra context for the client, such as the provider's reply
    pub data: Option<serde_json::Value>,
}

impl ApiError {
    /// Create an error with an arbitrary code
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create a not found error
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Create a bad request error
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    /// Create an internal error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    /// Attach context data
    #[must_use]
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.code.status_code()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<VerificationError> for ApiError {
    fn from(err: VerificationError) -> Self {
        let message = err.to_string();
        match err {
            VerificationError::NoFileUploaded => Self::new(ErrorCode::NoFileUploaded, message),
            VerificationError::UnexpectedField(_) => Self::new(ErrorCode::UnexpectedField, message),
            VerificationError::InvalidFileType { .. } => {
                Self::new(ErrorCode::InvalidFileType, message)
            },
            VerificationError::IncompleteData(_) => Self::new(ErrorCode::IncompleteData, message),
            VerificationError::GuidTooLong(_) => Self::new(ErrorCode::BadRequest, message),
            VerificationError::NotFound(_) => Self::new(ErrorCode::NotFound, message),
            VerificationError::UpstreamVerificationFailure { message, payload } => {
                let err = Self::new(ErrorCode::VerificationFailed, message);
                match payload {
                    Some(payload) => err.with_data(payload),
                    None => err,
                }
            },
            VerificationError::UpstreamUnreachable { timed_out: true, .. } => {
                Self::new(ErrorCode::UpstreamTimeout, message)
            },
            VerificationError::UpstreamUnreachable { .. } => {
                Self::new(ErrorCode::UpstreamUnreachable, message)
            },
            VerificationError::Storage(_) => Self::new(ErrorCode::StorageError, message),
        }
    }
}

/// Serializable error data for JSON responses
#[derive(Debug, Serialize)]
pub struct ApiErrorData {
    /// Error code string
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Extra context
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl From<&ApiError> for ApiErrorData {
    fn from(err: &ApiError) -> Self {
        Self {
            code: err.code.as_str().to_string(),
            message: err.message.clone(),
            data: err.data.clone(),
        }
    }
}
