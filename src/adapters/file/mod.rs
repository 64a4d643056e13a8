//! File-based record storage
//!
//! Implements `RecordStore` using one JSON document per transaction.

mod locks;
mod store;

pub use store::FileRecordStore;
