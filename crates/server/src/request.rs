use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use bytes::Bytes;
use http::{HeaderMap, Uri};
use http_body_util::BodyExt;
use lazy_regex::{lazy_regex, Lazy, Regex};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::decoder::BodyDecoder;
use crate::errors::{NormalizeError, ServerError, ServerResult};
use crate::field_method;
use crate::types::BoxedError;

static LEADING_SEPARATORS: Lazy<Regex> = lazy_regex!(r"^/+");

/// Page name used in place of an empty trimmed path.
pub const SITE_ROOT: &str = "index";

/// `FieldValue` is a query parameter or header value: a single string, or
/// every value in arrival order when the key was repeated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Many(Vec<String>),
}

impl FieldValue {
    /// The first value received for the key.
    #[must_use]
    pub fn first(&self) -> &str {
        match self {
            Self::Single(value) => value,
            Self::Many(values) => values.first().map_or("", String::as_str),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            Self::Single(existing) => {
                *self = Self::Many(vec![std::mem::take(existing), value]);
            }
            Self::Many(values) => values.push(value),
        }
    }
}

pub type FieldMap = BTreeMap<String, FieldValue>;

fn insert_field(fields: &mut FieldMap, key: String, value: String) {
    match fields.entry(key) {
        Entry::Occupied(mut entry) => entry.get_mut().push(value),
        Entry::Vacant(entry) => {
            entry.insert(FieldValue::Single(value));
        }
    }
}

/// Strips the leading run of `/` from a pathname: `/about/` becomes `about/`
/// and `/` becomes the empty string.
#[must_use]
pub fn trim_path(path: &str) -> String {
    LEADING_SEPARATORS.replace(path, "").into_owned()
}

#[must_use]
pub fn parse_query(uri: &Uri) -> FieldMap {
    let mut query = FieldMap::new();
    if let Some(raw) = uri.query() {
        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            insert_field(&mut query, key.into_owned(), value.into_owned());
        }
    }
    query
}

#[must_use]
pub fn collect_headers(headers: &HeaderMap) -> FieldMap {
    let mut fields = FieldMap::new();
    for (name, value) in headers {
        insert_field(
            &mut fields,
            String::from(name.as_str()),
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        );
    }
    fields
}

/// Parses the decoded body as JSON, falling back to an empty object.
#[must_use]
pub fn parse_payload(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|_| Value::Object(Map::new()))
}

/// `RequestData` is the normalized view of one request handed to the
/// handlers. It is only built once the whole body has arrived and is never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestData {
    trimmed_path: String,
    query: FieldMap,
    method: String,
    headers: FieldMap,
    payload: Value,
}

impl RequestData {
    #[must_use]
    pub fn trimmed_path(&self) -> &str {
        &self.trimmed_path
    }

    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    field_method!(query, FieldMap);
    field_method!(headers, FieldMap);
    field_method!(payload, Value);

    /// The trimmed path, or `index` for the site root.
    #[must_use]
    pub fn page_name(&self) -> &str {
        if self.trimmed_path.is_empty() {
            SITE_ROOT
        } else {
            &self.trimmed_path
        }
    }

    /// Compares the request method with `method`, ignoring case.
    #[must_use]
    pub fn is_method(&self, method: &str) -> bool {
        self.method.eq_ignore_ascii_case(method)
    }
}

/// `RequestNormalizer` holds everything taken from the request head while the
/// body is still streaming in. [`RequestNormalizer::finish`] consumes it, so a
/// request yields exactly one `RequestData`.
pub struct RequestNormalizer {
    trimmed_path: String,
    query: FieldMap,
    method: String,
    headers: FieldMap,
    decoder: BodyDecoder,
}

impl RequestNormalizer {
    /// Reads the method, target and headers of a request.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::MissingPathname`] for targets without a
    /// pathname, such as `CONNECT host:443` or `OPTIONS *`.
    pub fn begin(head: &http::request::Parts) -> Result<Self, NormalizeError> {
        let path = head.uri.path();
        if !path.starts_with('/') {
            return Err(NormalizeError::MissingPathname(head.uri.to_string()));
        }

        let trimmed_path = trim_path(path);
        let query = parse_query(&head.uri);
        let method = head.method.as_str().to_lowercase();
        let headers = collect_headers(&head.headers);

        trellis_trace::verbose!("Path: '{}' Trimmed path: '{}'", path, trimmed_path);
        trellis_trace::verbose!("Query: {:?}", query);
        trellis_trace::verbose!("Method: '{}'", method);
        trellis_trace::verbose!("Headers: {:?}", headers);

        Ok(Self {
            trimmed_path,
            query,
            method,
            headers,
            decoder: BodyDecoder::new(),
        })
    }

    pub fn feed(&mut self, chunk: &[u8]) {
        self.decoder.feed(chunk);
    }

    #[must_use]
    pub fn finish(self) -> RequestData {
        let body = self.decoder.finish();
        let payload = parse_payload(&body);

        trellis_trace::debug!(
            "Request data created for method: '{}' path: '{}'",
            self.method,
            self.trimmed_path
        );

        RequestData {
            trimmed_path: self.trimmed_path,
            query: self.query,
            method: self.method,
            headers: self.headers,
            payload,
        }
    }
}

/// Normalizes a full request, reading its body frames in arrival order.
///
/// # Errors
///
/// Fails with [`ServerError::Normalize`] when the target has no pathname and
/// with [`ServerError::Body`] when the body stream fails.
pub async fn read_request<B>(request: http::Request<B>) -> ServerResult<RequestData>
where
    B: http_body::Body<Data = Bytes> + Unpin,
    B::Error: Into<BoxedError>,
{
    let (head, mut body) = request.into_parts();
    let mut normalizer = RequestNormalizer::begin(&head)?;

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(|err| ServerError::Body(err.into()))?;
        if let Ok(chunk) = frame.into_data() {
            normalizer.feed(&chunk);
        }
    }

    Ok(normalizer.finish())
}
