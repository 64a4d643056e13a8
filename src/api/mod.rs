//! HTTP-agnostic API layer
//!
//! This module provides typed request/response structures and pure handlers
//! that can be used by any HTTP server implementation (`tiny_http`, axum, etc.)
//! or directly by the CLI.
//!
//! ## Design
//!
//! - **Handlers are pure functions**: Take state and typed input, return `Result<T, ApiError>`
//! - **Types are framework-agnostic**: No HTTP types leak into this module
//! - **Errors carry HTTP semantics**: `ApiError` knows its status code for translation

mod error;
mod handlers;
mod state;
mod types;

pub use error::{ApiError, ApiErrorData, ErrorCode};
pub use handlers::{approve, get_result, health, list_results, receive_callback, reject, upload};
pub use state::{AppState, open_store};
pub use types::{
    ApiResponse, CallbackRequest, DecisionData, HealthData, MessageData, UploadData,
    VerificationData, VerificationsData,
};
