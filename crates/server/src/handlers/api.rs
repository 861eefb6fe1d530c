use http::StatusCode;
use serde_json::json;

use crate::content_types;
use crate::dispatch::Handler;
use crate::request::RequestData;
use crate::response::{ResponseDescriptor, Responder};

/// Stands in for the api family, which has no handlers yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiPlaceholder;

impl Handler for ApiPlaceholder {
    fn handle(&self, request: RequestData, responder: Responder) {
        responder.respond(
            ResponseDescriptor::new()
                .with_status(StatusCode::NOT_IMPLEMENTED.as_u16())
                .with_content_type(content_types::JSON)
                .with_payload(json!({
                    "error": "api handlers are not implemented",
                    "path": request.trimmed_path(),
                })),
        );
    }
}
