//! Business logic services
//!
//! Orchestration of the verification workflow on top of the port traits.
//!
//! - [`reconciler`] - Record results from either path, apply admin decisions
//! - [`dispatcher`] - Validate, store and forward uploads

pub mod dispatcher;
pub mod reconciler;

pub use dispatcher::{Dispatched, FILE_FIELD, FilePart, UploadDispatcher};
pub use reconciler::Reconciler;
