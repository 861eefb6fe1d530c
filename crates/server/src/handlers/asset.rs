use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;

use crate::content_types;
use crate::dispatch::Handler;
use crate::handlers::contained_path;
use crate::request::RequestData;
use crate::response::{ResponseDescriptor, Responder};

/// `AssetHandler` serves files below its root directory, answering with the
/// content-type key of the file's extension.
#[derive(Debug, Clone)]
pub struct AssetHandler {
    root: Arc<PathBuf>,
}

impl AssetHandler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Arc::new(root.into()),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Content-type key for a file, taken from its extension.
#[must_use]
pub fn content_type_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|extension| extension.to_str())
        .map_or(content_types::PLAIN, content_types::key_for_extension)
}

fn not_found() -> ResponseDescriptor {
    ResponseDescriptor::new()
        .with_status(StatusCode::NOT_FOUND.as_u16())
        .with_content_type(content_types::PLAIN)
}

impl Handler for AssetHandler {
    fn handle(&self, request: RequestData, responder: Responder) {
        if !(request.is_method("get") || request.is_method("head")) {
            responder.respond(
                ResponseDescriptor::new()
                    .with_status(StatusCode::METHOD_NOT_ALLOWED.as_u16())
                    .with_content_type(content_types::PLAIN),
            );
            return;
        }

        let Some(target) = contained_path(&self.root, request.trimmed_path()) else {
            trellis_trace::warn!("Rejected asset path: '{}'", request.trimmed_path());
            responder.respond(not_found());
            return;
        };

        tokio::spawn(async move {
            match tokio::fs::read(&target).await {
                Ok(contents) => responder.respond(
                    ResponseDescriptor::new()
                        .with_status(StatusCode::OK.as_u16())
                        .with_content_type(content_type_for_path(&target))
                        .with_payload(Bytes::from(contents)),
                ),
                Err(err) => {
                    trellis_trace::debug!("Failed to read asset {:?}: {}", target, err);
                    responder.respond(not_found());
                }
            }
        });
    }
}
