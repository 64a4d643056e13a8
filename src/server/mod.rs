//! HTTP server adapters
//!
//! This module provides adapters that translate between HTTP frameworks
//! and the HTTP-agnostic API layer.
//!
//! Currently supported:
//! - `tiny_http` - Lightweight threaded HTTP server
//!
//! [`multipart`] holds the `multipart/form-data` parser used for uploads.

pub mod multipart;
pub mod tiny_http;
