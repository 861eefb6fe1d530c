// Types for the packages

use http_body_util::combinators::BoxBody;

pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, BoxedError>;

pub type JoinHandle<T> = tokio::task::JoinHandle<Result<T>>;

pub type ResponseBody = BoxBody<bytes::Bytes, hyper::Error>;

pub type HyperResponse = hyper::Response<ResponseBody>;
