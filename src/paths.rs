//! Centralized path definitions for idverify
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/idverify/            # ~/.local/share/idverify on Linux
//! ├── records/                    # One JSON file per transaction
//! │   └── <hex transactionGuid>.json
//! └── uploads/                    # Uploaded documents, never removed
//!     └── 1718000000000-photo.png
//! ```
//!
//! Every location can be overridden through configuration.

use std::path::PathBuf;

/// Application directory name
const APP_DIR: &str = "idverify";

/// Uploads subdirectory
const UPLOADS_DIR: &str = "uploads";

/// Default config filename, looked up in the working directory
pub const CONFIG_FILE: &str = "idverify.toml";

/// Get the default data directory.
///
/// Falls back to `./idverify` when the platform has no data directory.
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR)
}

/// Get the default upload directory.
#[must_use]
pub fn upload_dir() -> PathBuf {
    data_dir().join(UPLOADS_DIR)
}
