//! Disk storage for uploaded documents
//!
//! Files are named `<unix millis>-<original name>` inside the upload directory.
//! The original name is reduced to its final path component and to a safe
//! character set first.

use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::core::StoreError;
use crate::core::models::{DocumentKind, StoredUpload, UploadedFile};
use crate::core::ports::UploadStorage;

/// Give up on finding a free name after this many suffixes
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Upload storage writing into a single directory
#[derive(Debug, Clone)]
pub struct DiskUploadStorage {
    dir: PathBuf,
}

impl DiskUploadStorage {
    /// Store uploads under `dir` (created on first save)
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Upload directory
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl UploadStorage for DiskUploadStorage {
    fn save(&self, file: &UploadedFile, kind: DocumentKind) -> Result<StoredUpload, StoreError> {
        fs::create_dir_all(&self.dir)?;
        let base = format!("{}-{}", Utc::now().timestamp_millis(), sanitize_file_name(&file.file_name));

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                base.clone()
            } else {
                with_suffix(&base, attempt)
            };
            let path = self.dir.join(name);
            // create_new makes the name claim atomic between concurrent uploads
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut out) => {
                    out.write_all(&file.bytes)?;
                    out.sync_all()?;
                    return Ok(StoredUpload {
                        path,
                        original_name: file.file_name.clone(),
                        kind,
                    });
                },
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {},
                Err(e) => return Err(e.into()),
            }
        }

        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("no free upload name for {base}"),
        )))
    }
}

/// Keep the last path component and replace anything outside `[A-Za-z0-9._-]`
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = last
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let trimmed = cleaned.trim_start_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

fn with_suffix(base: &str, n: u32) -> String {
    match base.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}-{n}.{ext}"),
        None => format!("{base}-{n}"),
    }
}
