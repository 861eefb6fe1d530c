use http_body_util::{BodyExt, Empty, Full};

use crate::types::ResponseBody;

#[must_use]
pub fn empty() -> ResponseBody {
    Empty::<bytes::Bytes>::new()
        .map_err(|never| match never {})
        .boxed()
}

pub fn full<T: Into<bytes::Bytes>>(chunk: T) -> ResponseBody {
    Full::new(chunk.into())
        .map_err(|never| match never {})
        .boxed()
}
