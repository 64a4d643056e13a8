//! `multipart/form-data` body parsing
//!
//! Takes the boundary from the `Content-Type` header and hands the body to
//! the `multipart` crate's server-side reader. The whole body is expected in
//! memory.

use std::io::{Cursor, Read as _};

use ::multipart::server::Multipart;
use thiserror::Error;

const DEFAULT_PART_TYPE: &str = "application/octet-stream";

/// One part of a multipart body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Form field name
    pub name: String,
    /// Filename, present for file fields
    pub file_name: Option<String>,
    /// Declared content type of the part
    pub content_type: String,
    /// Raw part content
    pub data: Vec<u8>,
}

/// Why a multipart body could not be parsed
#[derive(Debug, Error)]
pub enum MultipartError {
    /// `Content-Type` is not `multipart/form-data`
    #[error("expected multipart/form-data, got '{0}'")]
    NotMultipart(String),
    /// `Content-Type` has no boundary parameter
    #[error("missing multipart boundary")]
    MissingBoundary,
    /// Body does not follow the multipart grammar
    #[error("malformed multipart body: {0}")]
    Malformed(#[from] std::io::Error),
}

/// Extract the boundary from a `Content-Type` header value
pub fn boundary(content_type: &str) -> Result<String, MultipartError> {
    let mut params = content_type.split(';');
    let essence = params.next().unwrap_or("").trim();
    if !essence.eq_ignore_ascii_case("multipart/form-data") {
        return Err(MultipartError::NotMultipart(essence.to_string()));
    }
    params
        .filter_map(|p| p.split_once('='))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("boundary"))
        .map(|(_, v)| v.trim().trim_matches('"').to_string())
        .filter(|b| !b.is_empty())
        .ok_or(MultipartError::MissingBoundary)
}

/// Split a body into its parts
pub fn parse(body: &[u8], boundary: &str) -> Result<Vec<Part>, MultipartError> {
    let mut form = Multipart::with_body(Cursor::new(body), boundary);
    let mut parts = Vec::new();
    while let Some(mut field) = form.read_entry()? {
        let mut data = Vec::new();
        field.data.read_to_end(&mut data)?;
        parts.push(Part {
            name: field.headers.name.to_string(),
            file_name: field.headers.filename.clone(),
            content_type: field
                .headers
                .content_type
                .as_ref()
                .map_or_else(|| DEFAULT_PART_TYPE.to_string(), ToString::to_string),
            data,
        });
    }
    Ok(parts)
}
