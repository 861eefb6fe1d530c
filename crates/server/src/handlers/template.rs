use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use http::StatusCode;
use lazy_regex::{lazy_regex, regex::Captures, Lazy, Regex};

use crate::content_types;
use crate::dispatch::Handler;
use crate::handlers::contained_path;
use crate::request::{RequestData, SITE_ROOT};
use crate::response::{ResponseDescriptor, Responder};

static PLACEHOLDER: Lazy<Regex> = lazy_regex!(r"\{\{\s*([A-Za-z0-9_.-]+)\s*\}\}");

const TEMPLATE_EXTENSION: &str = "html";

pub type TemplateGlobals = BTreeMap<String, String>;

/// Replaces every `{{ name }}` placeholder with its value from `globals`;
/// names without a value render as nothing.
#[must_use]
pub fn render(template: &str, globals: &TemplateGlobals) -> String {
    PLACEHOLDER
        .replace_all(template, |captures: &Captures<'_>| {
            globals.get(&captures[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

/// `TemplateHandler` answers page requests with `<root>/<page>.html`
/// rendered against the configured template globals.
#[derive(Debug, Clone)]
pub struct TemplateHandler {
    root: Arc<PathBuf>,
    globals: Arc<TemplateGlobals>,
}

impl TemplateHandler {
    pub fn new(root: impl Into<PathBuf>, globals: TemplateGlobals) -> Self {
        Self {
            root: Arc::new(root.into()),
            globals: Arc::new(globals),
        }
    }

    fn page_file(&self, request: &RequestData) -> Option<PathBuf> {
        let page = request.page_name().trim_end_matches('/');
        let page = if page.is_empty() { SITE_ROOT } else { page };
        contained_path(&self.root, &format!("{page}.{TEMPLATE_EXTENSION}"))
    }
}

fn page_status(status: StatusCode) -> ResponseDescriptor {
    ResponseDescriptor::new()
        .with_status(status.as_u16())
        .with_content_type(content_types::HTML)
}

impl Handler for TemplateHandler {
    fn handle(&self, request: RequestData, responder: Responder) {
        if !(request.is_method("get") || request.is_method("head")) {
            responder.respond(page_status(StatusCode::METHOD_NOT_ALLOWED));
            return;
        }

        let Some(page_file) = self.page_file(&request) else {
            responder.respond(page_status(StatusCode::NOT_FOUND));
            return;
        };

        let globals = self.globals.clone();
        tokio::spawn(async move {
            match tokio::fs::read_to_string(&page_file).await {
                Ok(template) => {
                    responder.respond(
                        page_status(StatusCode::OK).with_payload(render(&template, &globals)),
                    );
                }
                Err(err) => {
                    trellis_trace::debug!("Failed to load page {:?}: {}", page_file, err);
                    responder.respond(page_status(StatusCode::NOT_FOUND));
                }
            }
        });
    }
}
