use bytes::Bytes;
use http::{header, HeaderValue, StatusCode};
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::body::{empty, full};
use crate::content_types;
use crate::fixers::{fix_content_type, fix_payload, fix_status_code};
use crate::payload::Payload;
use crate::types::HyperResponse;

/// `ResponseDescriptor` is what a handler answers with. Every field is
/// optional and loosely typed; the response writer fixes them up:
///
/// - `status_code`: an integer HTTP status, `200` otherwise.
/// - `payload`: serialized according to the content-type key.
/// - `content_type`: a content-type key such as `html` or `png`, `json` otherwise.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseDescriptor {
    pub status_code: Option<Value>,
    pub payload: Option<Payload>,
    pub content_type: Option<Value>,
}

impl ResponseDescriptor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_status(mut self, status_code: impl Into<Value>) -> Self {
        self.status_code = Some(status_code.into());
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<Value>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<Payload>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new()
            .with_status(StatusCode::BAD_REQUEST.as_u16())
            .with_payload(json!({ "error": message.into() }))
    }

    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new()
            .with_status(StatusCode::INTERNAL_SERVER_ERROR.as_u16())
            .with_payload(json!({ "error": message.into() }))
    }

    /// Runs every field through the fixers.
    #[must_use]
    pub fn normalize(self) -> NormalizedResponse {
        let status_code = fix_status_code(self.status_code.as_ref());
        let content_type = fix_content_type(self.content_type.as_ref());
        let body = fix_payload(&content_type, self.payload);

        NormalizedResponse {
            status: StatusCode::from_u16(status_code).unwrap_or(StatusCode::OK),
            content_type,
            body,
        }
    }
}

/// A response whose fields went through the fixers and can be written as is.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResponse {
    pub status: StatusCode,
    pub content_type: String,
    pub body: Bytes,
}

impl NormalizedResponse {
    #[must_use]
    pub fn mime(&self) -> &'static str {
        content_types::header_value_for(&self.content_type)
    }

    #[must_use]
    pub fn into_http(self) -> HyperResponse {
        let mime = self.mime();
        let body = if self.body.is_empty() {
            empty()
        } else {
            full(self.body)
        };

        let mut response = hyper::Response::new(body);
        *response.status_mut() = self.status;
        response
            .headers_mut()
            .insert(header::CONTENT_TYPE, HeaderValue::from_static(mime));
        response
    }
}

/// Fixes the descriptor, writes the status, content type and body, and logs
/// a summary of the exchange.
#[must_use]
pub fn write_response(
    method: &str,
    trimmed_path: &str,
    descriptor: ResponseDescriptor,
) -> HyperResponse {
    let normalized = descriptor.normalize();
    trellis_trace::verbose!(
        "Status: {} Content type: '{}'",
        normalized.status,
        normalized.content_type
    );

    let status = normalized.status;
    let response = normalized.into_http();
    log_response(method, trimmed_path, status);
    response
}

fn log_response(method: &str, trimmed_path: &str, status: StatusCode) {
    if status == StatusCode::OK {
        trellis_trace::info!(
            "Method: '{}' Path: '{}' Status: {}",
            method,
            trimmed_path,
            status.as_u16()
        );
    } else {
        trellis_trace::warn!(
            "Method: '{}' Path: '{}' Status: {}",
            method,
            trimmed_path,
            status.as_u16()
        );
    }
}

/// `Responder` is the completion side handed to a handler together with the
/// request. Responding consumes it, so a handler answers at most once; it can
/// do so right away or later from a spawned task.
pub struct Responder {
    sender: oneshot::Sender<ResponseDescriptor>,
}

impl Responder {
    #[must_use]
    pub fn channel() -> (Self, oneshot::Receiver<ResponseDescriptor>) {
        let (sender, receiver) = oneshot::channel();
        (Self { sender }, receiver)
    }

    pub fn respond(self, descriptor: ResponseDescriptor) {
        if self.sender.send(descriptor).is_err() {
            trellis_trace::debug!("Response dropped, connection already closed");
        }
    }
}
