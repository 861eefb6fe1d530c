use thiserror::Error;

use crate::types::BoxedError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind listener on {0}: {1}")]
    Bind(String, std::io::Error),

    #[error("failed to get new client connection: {0}")]
    Accept(std::io::Error),

    #[error("failed to read request body: {0}")]
    Body(BoxedError),

    #[error("failed to serve http1 connection: {0}")]
    Connection(hyper::Error),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// Raised while turning the request head into a `RequestData`; answered
/// with a client error instead of being dispatched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("request target has no pathname: {0}")]
    MissingPathname(String),
}
