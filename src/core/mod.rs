//! Core domain logic for idverify
//!
//! This module contains the verification workflow with no direct I/O.
//! All external interactions are abstracted through port traits.
//!
//! ## Architecture
//!
//! - `models/` - Domain types (`VerificationRecord`, `Approval`, `UploadedFile`)
//! - `services/` - Reconciler and upload dispatcher
//! - `ports/` - Trait definitions for storage and the verification provider
//! - `error` - Domain error taxonomy

pub mod error;
pub mod models;
pub mod ports;
pub mod services;

pub use error::{StoreError, VerificationError};
