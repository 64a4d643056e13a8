//! Adapter implementations for port traits
//!
//! This module contains concrete implementations that handle I/O:
//!
//! - `file/` - JSON file record storage
//! - `memory/` - In-memory record storage
//! - `uploads/` - Uploaded documents on disk
//! - `http/` - Verification provider over HTTP

pub mod file;
pub mod http;
pub mod memory;
pub mod uploads;

pub use file::FileRecordStore;
pub use http::HttpVerificationProvider;
pub use memory::MemoryRecordStore;
pub use uploads::DiskUploadStorage;
