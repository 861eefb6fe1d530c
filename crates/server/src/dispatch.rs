use std::sync::Arc;

use trellis_config::ServerConfig;

use crate::handlers::{ApiPlaceholder, AssetHandler, TemplateHandler};
use crate::request::RequestData;
use crate::response::{write_response, ResponseDescriptor, Responder};
use crate::types::HyperResponse;

/// `HandlerKind` names the three handler families a request can land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    Asset,
    Api,
    Template,
}

impl HandlerKind {
    /// First match wins: anything with a `.` is an asset (so `api/file.json`
    /// is an asset), then anything containing `api/`, then pages.
    #[must_use]
    pub fn choose(trimmed_path: &str) -> Self {
        if trimmed_path.contains('.') {
            Self::Asset
        } else if trimmed_path.contains("api/") {
            Self::Api
        } else {
            Self::Template
        }
    }
}

impl core::fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Asset => write!(f, "asset"),
            Self::Api => write!(f, "api"),
            Self::Template => write!(f, "template"),
        }
    }
}

/// `Handler` answers a request through its `Responder`, either before
/// returning or later from a task it spawned.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, request: RequestData, responder: Responder);
}

impl<F> Handler for F
where
    F: Fn(RequestData, Responder) + Send + Sync + 'static,
{
    fn handle(&self, request: RequestData, responder: Responder) {
        (self)(request, responder);
    }
}

pub type SharedHandler = Arc<dyn Handler>;

/// `Dispatcher` holds one handler per family. A family without a handler,
/// or a handler that drops its `Responder`, is answered with a 500.
#[derive(Clone, Default)]
pub struct Dispatcher {
    asset: Option<SharedHandler>,
    api: Option<SharedHandler>,
    template: Option<SharedHandler>,
}

// -- Constructors

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wires the built-in handlers against the directories and template
    /// globals of `config`.
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new()
            .with_asset(AssetHandler::new(config.public_directory.clone()))
            .with_template(TemplateHandler::new(
                config.templates_directory.clone(),
                config.template_globals.clone(),
            ))
            .with_api(ApiPlaceholder)
    }

    #[must_use]
    pub fn with_asset(mut self, handler: impl Handler) -> Self {
        self.asset = Some(Arc::new(handler));
        self
    }

    #[must_use]
    pub fn with_api(mut self, handler: impl Handler) -> Self {
        self.api = Some(Arc::new(handler));
        self
    }

    #[must_use]
    pub fn with_template(mut self, handler: impl Handler) -> Self {
        self.template = Some(Arc::new(handler));
        self
    }
}

// -- Dispatching

impl Dispatcher {
    fn handler_for(&self, kind: HandlerKind) -> Option<&SharedHandler> {
        match kind {
            HandlerKind::Asset => self.asset.as_ref(),
            HandlerKind::Api => self.api.as_ref(),
            HandlerKind::Template => self.template.as_ref(),
        }
    }

    /// Hands `request` to the handler its path selects and writes whatever
    /// the handler answers.
    pub async fn dispatch(&self, request: RequestData) -> HyperResponse {
        let kind = HandlerKind::choose(request.trimmed_path());
        let method = String::from(request.method());
        let trimmed_path = String::from(request.trimmed_path());

        trellis_trace::verbose!("Chosen handler: '{}'", kind);

        let descriptor = match self.handler_for(kind) {
            Some(handler) => {
                let (responder, reply) = Responder::channel();
                handler.handle(request, responder);

                match reply.await {
                    Ok(descriptor) => descriptor,
                    Err(_) => {
                        trellis_trace::error!(
                            "Handler '{}' finished without responding to: '{}'",
                            kind,
                            trimmed_path
                        );
                        ResponseDescriptor::internal_error("handler did not respond")
                    }
                }
            }
            None => {
                trellis_trace::error!("No handler registered for '{}' requests", kind);
                ResponseDescriptor::internal_error("no handler available for request")
            }
        };

        write_response(&method, &trimmed_path, descriptor)
    }
}
