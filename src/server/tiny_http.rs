//! `tiny_http` server adapter
//!
//! Handles routing, body parsing, and response conversion for `tiny_http`,
//! plus the worker pool that serves requests concurrently.

use std::borrow::Cow;
use std::io::{Cursor, Read as _};
use std::sync::Arc;
use std::thread;

use percent_encoding::percent_decode_str;
use serde::{Serialize, de::DeserializeOwned};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use super::multipart;
use crate::api::{self, ApiError, ApiResponse, AppState, CallbackRequest};
use crate::core::models::UploadedFile;
use crate::core::services::FilePart;

/// Largest request body accepted, in bytes
pub const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

// =============================================================================
// SERVER LOOP
// =============================================================================

/// Bind a server to `addr` (`host:port`, port 0 picks a free one)
pub fn bind(addr: &str) -> anyhow::Result<Server> {
    Server::http(addr).map_err(|e| anyhow::anyhow!("Failed to start server on {addr}: {e}"))
}

/// Serve requests with `workers` threads until the server is unblocked
///
/// Each worker pulls requests from the shared listener, so a slow provider
/// call only ties up its own thread.
pub fn run(server: Arc<Server>, state: AppState, workers: usize) {
    let handles: Vec<_> = (0..workers.max(1))
        .map(|i| {
            let server = Arc::clone(&server);
            let state = state.clone();
            thread::Builder::new()
                .name(format!("idverify-worker-{i}"))
                .spawn(move || worker_loop(&server, &state))
        })
        .collect();

    for handle in handles {
        match handle {
            Ok(handle) => {
                if handle.join().is_err() {
                    log::error!("Worker thread panicked");
                }
            },
            Err(e) => log::error!("Failed to spawn worker thread: {e}"),
        }
    }
}

fn worker_loop(server: &Server, state: &AppState) {
    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();
        let response = handle_request(state, &mut request);
        log::debug!("{method} {url} -> {}", response.status_code().0);
        if let Err(e) = request.respond(response) {
            log::warn!("Failed to send response for {method} {url}: {e}");
        }
    }
}

// =============================================================================
// REQUEST HANDLING
// =============================================================================

/// Handle a request and return a response
///
/// This is the main routing function that maps URL paths to handlers.
pub fn handle_request(state: &AppState, request: &mut Request) -> Response<Cursor<Vec<u8>>> {
    let method = request.method().clone();
    let Ok(url) = url::Url::parse("http://localhost").and_then(|base| base.join(request.url()))
    else {
        return error_response(&ApiError::bad_request(format!("Invalid URL: {}", request.url())));
    };
    let segments = match path_segments(&url) {
        Ok(segments) => segments,
        Err(e) => return error_response(&e),
    };
    let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

    match (&method, segments.as_slice()) {
        (&Method::Get, ["health"]) => success_response(api::health()),

        // POST /upload - multipart document upload
        (&Method::Post, ["upload"]) => match read_file_parts(request) {
            Ok(parts) => handle_result(api::upload(state, parts)),
            Err(e) => error_response(&e),
        },

        // POST /callback/verification - provider pushes a result
        (&Method::Post, ["callback", "verification"]) => {
            match read_json_body::<CallbackRequest>(request) {
                Ok(req) => handle_result(api::receive_callback(state, &req)),
                Err(e) => error_response(&e),
            }
        },

        // GET /admin/results[?status=pending]
        (&Method::Get, ["admin", "results"]) => {
            let status = url
                .query_pairs()
                .find(|(k, _)| k == "status")
                .map(|(_, v)| v.into_owned());
            handle_result(api::list_results(state, status.as_deref()))
        },

        // GET /admin/results/{transactionGuid}
        (&Method::Get, ["admin", "results", id]) => handle_result(api::get_result(state, id)),

        // POST /admin/approve/{transactionGuid}
        (&Method::Post, ["admin", "approve", id]) => handle_result(api::approve(state, id)),

        // POST /admin/reject/{transactionGuid}
        (&Method::Post, ["admin", "reject", id]) => handle_result(api::reject(state, id)),

        // 404 for unknown routes
        _ => not_found_response(&format!("Endpoint not found: {method} {}", url.path())),
    }
}

/// Non-empty path segments, percent-decoded
fn path_segments(url: &url::Url) -> Result<Vec<String>, ApiError> {
    url.path_segments()
        .into_iter()
        .flatten()
        .filter(|seg| !seg.is_empty())
        .map(|seg| {
            percent_decode_str(seg)
                .decode_utf8()
                .map(Cow::into_owned)
                .map_err(|_| ApiError::bad_request(format!("Path segment is not UTF-8: {seg}")))
        })
        .collect()
}

// =============================================================================
// BODY PARSING
// =============================================================================

/// Read the raw body, bounded by [`MAX_BODY_BYTES`]
fn read_body(request: &mut Request) -> Result<Vec<u8>, ApiError> {
    if request.body_length().is_some_and(|len| len > MAX_BODY_BYTES) {
        return Err(too_large());
    }
    let mut body = Vec::new();
    request
        .as_reader()
        .take(MAX_BODY_BYTES as u64 + 1)
        .read_to_end(&mut body)
        .map_err(|e| ApiError::bad_request(format!("Failed to read request body: {e}")))?;
    if body.len() > MAX_BODY_BYTES {
        return Err(too_large());
    }
    Ok(body)
}

fn too_large() -> ApiError {
    ApiError::bad_request(format!("Request body exceeds {MAX_BODY_BYTES} bytes"))
}

/// Read and parse JSON body from request
fn read_json_body<T: DeserializeOwned>(request: &mut Request) -> Result<T, ApiError> {
    let body = read_body(request)?;
    serde_json::from_slice(&body).map_err(|e| ApiError::bad_request(format!("Invalid JSON: {e}")))
}

/// Read a multipart body and keep the file parts
///
/// Text fields are ignored. A file input left empty by the browser
/// (empty filename, no content) counts as no file.
fn read_file_parts(request: &mut Request) -> Result<Vec<FilePart>, ApiError> {
    let content_type = header_value(request, "Content-Type").unwrap_or_default();
    let boundary = multipart::boundary(&content_type).map_err(|e| ApiError::bad_request(e.to_string()))?;
    let body = read_body(request)?;
    let parts = multipart::parse(&body, &boundary).map_err(|e| ApiError::bad_request(e.to_string()))?;

    Ok(parts
        .into_iter()
        .filter_map(|part| {
            let file_name = part.file_name?;
            if file_name.is_empty() && part.data.is_empty() {
                return None;
            }
            Some(FilePart {
                field: part.name,
                file: UploadedFile::new(file_name, part.content_type, part.data),
            })
        })
        .collect())
}

fn header_value(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str().to_string())
}

// =============================================================================
// RESPONSE CONVERSION
// =============================================================================

/// Convert a handler result to an HTTP response
fn handle_result<T: Serialize>(result: Result<T, ApiError>) -> Response<Cursor<Vec<u8>>> {
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_response(&e),
    }
}

/// Create a successful JSON response
fn success_response<T: Serialize>(data: T) -> Response<Cursor<Vec<u8>>> {
    let response = ApiResponse::success(data);
    json_response(&response, 200)
}

/// Create an error JSON response with appropriate status code
fn error_response(error: &ApiError) -> Response<Cursor<Vec<u8>>> {
    if error.status_code() >= 500 {
        log::error!("{error}");
    }
    let response = ApiResponse::<()>::from_error(error);
    json_response(&response, error.status_code())
}

/// Create a 404 not found response
fn not_found_response(message: &str) -> Response<Cursor<Vec<u8>>> {
    let response = ApiResponse::<()>::error("NOT_FOUND", message);
    json_response(&response, 404)
}

/// Serialize data to JSON response with status code
fn json_response<T: Serialize>(data: &T, status: u16) -> Response<Cursor<Vec<u8>>> {
    let json = serde_json::to_string(data).unwrap_or_else(|_| r#"{"success":false}"#.to_string());
    let mut response = Response::from_data(json.into_bytes()).with_status_code(StatusCode(status));
    if let Ok(header) = Header::from_bytes("Content-Type", "application/json") {
        response.add_header(header);
    }
    response
}
