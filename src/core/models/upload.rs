//! Uploaded identity documents
//!
//! Only images and PDFs are accepted. The declared mime type and the file
//! extension must each be on the allow-list; the extension names the type.

use std::path::{Path, PathBuf};

/// A file received from a client, not yet written anywhere
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original filename as sent by the client
    pub file_name: String,
    /// Declared mime type (`Content-Type` of the part)
    pub content_type: String,
    /// Raw file content
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Create a new uploaded file
    #[must_use]
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Lowercased extension of the original filename
    #[must_use]
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
    }

    /// Classify the upload, `None` if it is not an accepted document type
    ///
    /// The type comes from the extension. The mime type only has to be
    /// accepted, not the same type.
    #[must_use]
    pub fn kind(&self) -> Option<DocumentKind> {
        DocumentKind::from_mime(&self.content_type)?;
        DocumentKind::from_extension(&self.extension()?)
    }
}

/// Accepted document types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// JPEG image (`.jpg` / `.jpeg`)
    Jpeg,
    /// PNG image
    Png,
    /// PDF document
    Pdf,
}

impl DocumentKind {
    /// Classify a mime type, ignoring parameters such as `; charset=`
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or("").trim().to_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/png" => Some(Self::Png),
            "application/pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Classify a lowercase extension without the dot
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Canonical mime type
    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Pdf => "application/pdf",
        }
    }
}

/// A file that has been written to durable storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    /// Where the file lives
    pub path: PathBuf,
    /// Original filename as sent by the client
    pub original_name: String,
    /// Document type
    pub kind: DocumentKind,
}
