// Implements the unified http server: every request is normalized into a
// `RequestData`, dispatched to one of the asset, api or template handler
// families and the handler's reply is fixed up before it hits the wire.

mod macros;

pub mod body;
pub mod content_types;
pub mod decoder;
pub mod dispatch;
pub mod errors;
pub mod fixers;
pub mod handlers;
pub mod payload;
pub mod request;
pub mod response;
pub mod server;
pub mod types;

pub use body::*;
pub use dispatch::*;
pub use errors::*;
pub use payload::*;
pub use request::*;
pub use response::*;
pub use server::*;
