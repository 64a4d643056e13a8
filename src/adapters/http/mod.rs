//! HTTP client for the verification provider
//!
//! Sends the stored document as multipart field `file` to
//! `<base_url>/callback/verification` and decodes the JSON reply.

use std::time::Duration;

use reqwest::blocking::{Client, multipart};

use crate::core::models::StoredUpload;
use crate::core::ports::{ProviderError, ProviderReply, VerificationProvider};

/// Path appended to the provider base URL
pub const VERIFICATION_PATH: &str = "/callback/verification";

/// Longest body excerpt kept in error messages
const ERROR_BODY_LIMIT: usize = 512;

/// Verification provider reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpVerificationProvider {
    client: Client,
    endpoint: String,
}

impl HttpVerificationProvider {
    /// Build a client with a bounded request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("idverify/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint_url(base_url),
        })
    }

    /// Full URL uploads are posted to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Join the base URL and the verification path without doubling slashes
#[must_use]
pub fn endpoint_url(base_url: &str) -> String {
    format!("{}{VERIFICATION_PATH}", base_url.trim_end_matches('/'))
}

impl VerificationProvider for HttpVerificationProvider {
    fn submit(&self, upload: &StoredUpload) -> Result<ProviderReply, ProviderError> {
        let bytes = std::fs::read(&upload.path)?;
        let file_name = upload
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&upload.original_name)
            .to_string();
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(upload.kind.mime())
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        log::debug!("POST {} ({})", self.endpoint, upload.path.display());
        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .map_err(classify)?;

        let status = response.status();
        let body = response.text().map_err(classify)?;
        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate(&body),
            });
        }

        let body: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))?;
        log::debug!("Verification API response: {body}");
        Ok(ProviderReply { body })
    }
}

fn classify(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(err.to_string())
    } else {
        ProviderError::Transport(err.to_string())
    }
}

fn truncate(body: &str) -> String {
    if body.len() <= ERROR_BODY_LIMIT {
        return body.to_string();
    }
    let mut end = ERROR_BODY_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
